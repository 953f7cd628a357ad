pub mod ledger_store;
pub mod ledger_repo;
pub use ledger_repo::PgLedgerStore;
pub mod project_repo;
pub use project_repo::ProjectRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
