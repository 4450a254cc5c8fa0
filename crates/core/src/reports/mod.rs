//! Report assembly

pub mod assembler;

pub use assembler::{Deductions, PayrollExt, ReportAssembler};
