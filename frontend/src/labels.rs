//! UI text, looked up by dot path (`auth.login.title`) with `{{key}}`
//! placeholders.

use std::{collections::BTreeMap, sync::OnceLock};

use serde_json::{json, Value};

static LABELS: OnceLock<Value> = OnceLock::new();

fn table() -> &'static Value {
    LABELS.get_or_init(|| {
        json!({
            "app": {
                "name": "Mini Wallet",
                "title": "Mini Wallet - Digital Wallet Application",
                "subtitle": "Digital Wallet Application"
            },
            "navigation": {
                "dashboard": "Dashboard",
                "transactions": "Transactions",
                "profile": "Profile",
                "logout": "Logout",
                "login": "Sign In",
                "register": "Sign Up"
            },
            "auth": {
                "login": {
                    "title": "Sign in to your account",
                    "subtitle": "Or",
                    "createAccount": "create a new account",
                    "email": "Email address",
                    "password": "Password",
                    "forgotPassword": "Forgot your password?",
                    "signIn": "Sign in",
                    "signingIn": "Signing in...",
                    "emailPlaceholder": "Enter your email",
                    "passwordPlaceholder": "Enter your password"
                },
                "register": {
                    "title": "Create your account",
                    "subtitle": "Or",
                    "signIn": "sign in to your existing account",
                    "name": "Full Name",
                    "email": "Email address",
                    "password": "Password",
                    "confirmPassword": "Confirm Password",
                    "createAccount": "Create Account",
                    "creating": "Creating Account...",
                    "namePlaceholder": "Enter your full name",
                    "emailPlaceholder": "Enter your email",
                    "passwordPlaceholder": "Enter your password",
                    "confirmPasswordPlaceholder": "Confirm your password"
                },
                "forgotPassword": {
                    "title": "Forgot your password?",
                    "subtitle": "Enter your email address and we'll send you an OTP to reset your password.",
                    "email": "Email address",
                    "sendOtp": "Send OTP",
                    "sending": "Sending...",
                    "emailPlaceholder": "Enter your email address",
                    "backToLogin": "Back to login"
                },
                "forgotPasswordVerifyOtp": {
                    "title": "Verify OTP",
                    "subtitle": "Enter the 6-digit code sent to your email",
                    "otp": "Enter OTP",
                    "verify": "Verify OTP",
                    "verifying": "Verifying...",
                    "resend": "Resend OTP",
                    "resending": "Resending...",
                    "backToLogin": "Back to Sign In"
                },
                "forgotPasswordReset": {
                    "title": "Reset Password",
                    "subtitle": "Enter your new password",
                    "newPassword": "New Password",
                    "confirmPassword": "Confirm New Password",
                    "resetPassword": "Reset Password",
                    "resetting": "Resetting...",
                    "newPasswordPlaceholder": "Enter new password",
                    "confirmPasswordPlaceholder": "Confirm new password",
                    "backToLogin": "Back to login"
                },
                "emailVerification": {
                    "title": "Verify Your Email",
                    "subtitle": "We've sent a 6-digit verification code to your email address. Please enter it below.",
                    "otp": "Enter verification code",
                    "verify": "Verify Email",
                    "verifying": "Verifying...",
                    "resend": "Resend Code",
                    "resending": "Resending...",
                    "backToLogin": "Didn't receive the code? Check your spam folder or resend."
                }
            },
            "dashboard": {
                "welcome": "Welcome back, {{name}}!",
                "subtitle": "Manage your transactions and wallet settings from your dashboard.",
                "accountBalance": "Account Balance",
                "availableBalance": "Available balance",
                "recentTransactions": "Recent Transactions",
                "viewAll": "View all",
                "noTransactions": "No recent transactions",
                "noTransactionsSubtitle": "Your recent transactions will appear here",
                "newTransfer": "New Transfer",
                "createTransfer": "Create a new transfer",
                "transactions": "Transactions",
                "viewTransactions": "View and manage your transactions",
                "profile": "Profile",
                "manageProfile": "Manage your account settings"
            },
            "transactions": {
                "title": "Transactions",
                "sendMoney": "Send Money",
                "noTransactions": "No transactions",
                "noTransactionsSubtitle": "Get started by sending money.",
                "sentTo": "Sent to",
                "receivedFrom": "Received from",
                "fee": "Fee",
                "showing": "Showing {{from}} to {{to}} of {{total}} results",
                "previous": "Previous",
                "next": "Next",
                "page": "Page {{page}}"
            },
            "createTransaction": {
                "title": "Send Money",
                "subtitle": "Transfer money to another user's wallet",
                "backToTransactions": "← Back to Transactions",
                "receiverId": "Receiver ID",
                "receiverIdPlaceholder": "Enter receiver user ID",
                "receiverIdHelp": "Enter the user ID of the person you want to send money to",
                "amount": "Transfer Amount",
                "amountPlaceholder": "0.00",
                "amountHelp": "Enter the amount you want to send",
                "transferInfo": "Transfer Information",
                "transferInfoText": "This will transfer money from your wallet to another user's wallet. A commission fee of 1.5% will be deducted from your account.",
                "cancel": "Cancel",
                "sendMoney": "Send Money",
                "sending": "Sending..."
            },
            "profile": {
                "title": "Profile Information",
                "name": "Name",
                "email": "Email",
                "emailVerificationStatus": "Email Verification Status",
                "emailVerified": "Email Verified",
                "emailNotVerified": "Email Not Verified",
                "emailNotVerifiedWarning": "Please verify your email to access all features including password changes.",
                "verifyEmail": "Verify Email",
                "accountBalance": "Account Balance",
                "changePassword": "Change Password",
                "currentPassword": "Current Password",
                "newPassword": "New Password",
                "confirmPassword": "Confirm New Password",
                "updatePassword": "Update Password",
                "updating": "Updating...",
                "currentPasswordPlaceholder": "Enter current password",
                "newPasswordPlaceholder": "Enter new password",
                "confirmPasswordPlaceholder": "Confirm new password"
            },
            "common": {
                "loading": "Loading...",
                "error": "Error",
                "success": "Success",
                "cancel": "Cancel",
                "save": "Save",
                "back": "Back",
                "next": "Next",
                "previous": "Previous",
                "close": "Close",
                "submit": "Submit",
                "retry": "Retry",
                "ok": "OK"
            },
            "messages": {
                "success": {
                    "login": "Login successful!",
                    "register": "Registration successful! Please verify your email.",
                    "logout": "Logged out successfully!",
                    "emailVerified": "Email verified successfully!",
                    "passwordReset": "Password reset successfully! You can now login with your new password.",
                    "passwordChanged": "Password changed successfully!",
                    "transferSent": "Transfer sent successfully!",
                    "otpSent": "OTP sent to your email!",
                    "otpVerified": "OTP verified successfully!",
                    "verificationSent": "Verification token sent to your email!"
                },
                "error": {
                    "login": "Login failed. Please try again.",
                    "register": "Registration failed. Please try again.",
                    "emailVerification": "Email verification failed. Please try again.",
                    "passwordReset": "Password reset failed. Please try again.",
                    "transferFailed": "Transfer failed. Please try again.",
                    "otpInvalid": "Invalid OTP. Please try again.",
                    "otpExpired": "OTP has expired. Please request a new one.",
                    "networkError": "Network error. Please check your connection.",
                    "serverError": "Server error. Please try again later.",
                    "validationError": "Please check your input and try again.",
                    "unauthorized": "You are not authorized to perform this action.",
                    "forbidden": "Access denied.",
                    "notFound": "The requested resource was not found.",
                    "timeout": "Request timed out. Please try again."
                },
                "validation": {
                    "required": "This field is required",
                    "email": "Please enter a valid email address",
                    "password": "Password must be at least 8 characters",
                    "passwordMatch": "Passwords do not match",
                    "otpLength": "Please enter all 6 digits",
                    "otpValid": "Please enter a valid 6-digit code",
                    "amountPositive": "Amount must be greater than 0",
                    "receiverIdValid": "Valid receiver ID is required"
                }
            },
            "forms": {
                "email": "Email",
                "password": "Password",
                "confirmPassword": "Confirm Password",
                "name": "Name",
                "amount": "Amount",
                "receiverId": "Receiver ID",
                "otp": "OTP",
                "currentPassword": "Current Password",
                "newPassword": "New Password"
            },
            "status": {
                "loading": "Loading...",
                "success": "Success",
                "error": "Error",
                "warning": "Warning",
                "info": "Information",
                "pending": "Pending",
                "completed": "Completed",
                "failed": "Failed",
                "cancelled": "Cancelled"
            },
            "session": {
                "inactivityWarning": "You will be logged out in {{duration}} due to inactivity",
                "loggedOutInactivity": "You have been logged out due to inactivity"
            },
            "notifications": {
                "moneyReceived": "Money Received",
                "moneyReceivedDetail": "You received money from {{sender}}",
                "emailVerified": "Email Verified",
                "emailVerifiedDetail": "Your email has been successfully verified!",
                "passwordChanged": "Password Changed",
                "passwordChangedDetail": "Your password has been successfully changed."
            }
        })
    })
}

fn lookup(path: &str) -> Option<&'static Value> {
    path.split('.')
        .try_fold(table(), |node, key| node.as_object()?.get(key))
}

/// Replaces `{{key}}` with the matching entry in `data`. Unknown keys and
/// empty values leave the placeholder untouched.
pub fn interpolate(template: &str, data: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        let is_word = !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_');
        let value = data
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .filter(|v| is_word && !v.is_empty());
        match value {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Label at `path`, interpolated. Missing paths (or sections) return the
/// path itself.
pub fn label(path: &str, data: &[(&str, &str)]) -> String {
    match lookup(path).and_then(Value::as_str) {
        Some(text) => interpolate(text, data),
        None => path.to_string(),
    }
}

pub fn label_or(path: &str, fallback: &str) -> String {
    lookup(path)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Several labels at once, keyed by the last path segment.
pub fn labels_for(paths: &[&str], data: &[(&str, &str)]) -> BTreeMap<String, String> {
    paths
        .iter()
        .map(|path| {
            let key = path.rsplit('.').next().unwrap_or(path);
            (key.to_string(), label(path, data))
        })
        .collect()
}

/// Every string under `path`, flattened and keyed by leaf name.
pub fn section(path: &str, data: &[(&str, &str)]) -> BTreeMap<String, String> {
    fn collect(node: &Value, data: &[(&str, &str)], out: &mut BTreeMap<String, String>) {
        if let Some(map) = node.as_object() {
            for (key, value) in map {
                match value {
                    Value::String(text) => {
                        out.insert(key.clone(), interpolate(text, data));
                    }
                    Value::Object(_) => collect(value, data, out),
                    _ => {}
                }
            }
        }
    }

    let mut out = BTreeMap::new();
    if let Some(node) = lookup(path) {
        collect(node, data, &mut out);
    }
    out
}
