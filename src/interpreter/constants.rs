// Constants for the evaluator

/// Nested script calls allowed before evaluation is aborted
pub const MAX_CALL_DEPTH: usize = 256;

/// Module specifier the dispatch runtime is registered under
pub const RUNTIME_MODULE: &str = "macaroni";
