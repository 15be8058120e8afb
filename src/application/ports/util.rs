// src/application/ports/util.rs
pub trait CodeGenerator: Send + Sync {
    /// A fresh URL-safe value with at least 256 bits of entropy.
    fn generate(&self) -> String;
}
