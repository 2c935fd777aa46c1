pub mod residual;

#[cfg(test)]
mod residual_tests;

pub use residual::Verifier;
