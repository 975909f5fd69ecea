#[cfg(test)]
pub mod memory;
pub mod source;
