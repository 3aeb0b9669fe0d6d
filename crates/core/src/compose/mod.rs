/// Schema-driven decomposition of parameter text into editable values.
pub mod decompose;
/// Literal quoting policy for re-serialized scalar values.
pub mod quote;
/// Schema-driven reassembly of edited values into command text.
pub mod reassemble;
