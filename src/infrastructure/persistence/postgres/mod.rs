pub mod access_token_repository;
pub mod portfolio_repository;
pub mod user_repository;

pub use access_token_repository::PostgresAccessTokenRepository;
pub use portfolio_repository::PostgresPortfolioRepository;
pub use user_repository::PostgresUserRepository;
