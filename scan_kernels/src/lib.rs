#![cfg_attr(
    target_os = "cuda",
    no_std,
    feature(register_attr),
    register_attr(nvvm_internal)
)]

pub mod blelloch;
pub mod carry;
pub mod pow2;
pub mod step;
