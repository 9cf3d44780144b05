pub mod builders;
pub mod cancellation;
pub mod services;
pub mod validator;
