mod argon2_password_hasher;

pub use argon2_password_hasher::{
    Argon2PasswordHasher, DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM,
};
