pub mod catalog_service;
pub mod payment_service;
pub mod test_service;
pub mod user_service;

pub use catalog_service::CatalogService;
pub use payment_service::PaymentService;
pub use test_service::TestService;
pub use user_service::UserService;
