pub mod create_transaction;
pub mod dashboard;
pub mod email_verification;
pub mod forgot_password;
pub mod login;
pub mod profile;
pub mod register;
pub mod transactions;
pub mod validation;

pub use create_transaction::CreateTransactionPage;
pub use dashboard::DashboardPage;
pub use email_verification::EmailVerificationPage;
pub use forgot_password::{ForgotPasswordPage, ResetPasswordPage, VerifyOtpPage};
pub use login::LoginPage;
pub use profile::ProfilePage;
pub use register::RegisterPage;
pub use transactions::TransactionsPage;
