#![no_std]
extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod decode;
pub mod encode;
pub mod layout;
