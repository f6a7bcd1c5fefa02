//! Three-step password reset: request an OTP, verify it, choose a new
//! password. The email and verified token travel between steps in session
//! storage.

mod flow;
mod panel;

pub use panel::{ForgotPasswordPage, ResetPasswordPage, VerifyOtpPage};
