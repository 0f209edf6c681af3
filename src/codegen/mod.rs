//! Instruction sequence generators.

mod invoke;
mod nullcheck;
mod output;
mod repr;

pub use invoke::generate_invocation;
pub use nullcheck::{if_null_clear_pop_and_goto, if_null_pop_and_goto};
pub use output::generate_write;
pub use repr::{box_if_necessary, box_primitive, unbox_primitive};

#[cfg(test)]
mod nullcheck_test;
#[cfg(test)]
mod output_test;
