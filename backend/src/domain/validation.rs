//! Registration input validation.
//!
//! Pure functions with no store or network access. Rules run in a fixed order
//! and the first failure is reported, so clients always see one message.

use crate::domain::{
    AuthField, DisplayName, EmailAddress, FieldError, Password, RegistrationInput,
    UserValidationError, Username,
};

/// Minimum password length, counted in characters.
pub const PASSWORD_MIN: usize = 3;

const TOO_SHORT: &str = "length must be greater than 2";

/// Registration input that passed every rule.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub username: Username,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub password: Password,
}

impl ValidRegistration {
    /// Apply the registration rules in order:
    ///
    /// 1. username shorter than three characters;
    /// 2. username containing `@`;
    /// 3. email not shaped like `local@domain`;
    /// 4. password shorter than three characters.
    pub fn parse(input: &RegistrationInput) -> Result<Self, FieldError> {
        let username = Username::new(input.username.as_str()).map_err(username_error)?;
        let email = EmailAddress::new(input.email.as_str())
            .map_err(|_| FieldError::new(AuthField::Email, "invalid email"))?;
        if input.password.char_count() < PASSWORD_MIN {
            return Err(FieldError::new(AuthField::Password, TOO_SHORT));
        }

        Ok(Self {
            username,
            email,
            display_name: DisplayName::new(&input.full_name),
            password: input.password.clone(),
        })
    }
}

fn username_error(error: UserValidationError) -> FieldError {
    match error {
        UserValidationError::UsernameContainsAt => {
            FieldError::new(AuthField::Username, "cannot include an '@'")
        }
        _ => FieldError::new(AuthField::Username, TOO_SHORT),
    }
}

/// Check a registration form, returning the first rule it breaks.
///
/// # Examples
/// ```
/// use backend::domain::{validate_registration, AuthField, Password, RegistrationInput};
///
/// let input = RegistrationInput {
///     email: "bob@example.com".into(),
///     full_name: "Bob".into(),
///     username: "b@b".into(),
///     password: Password::new("secret"),
/// };
/// let error = validate_registration(&input).expect("username with '@' is rejected");
/// assert_eq!(error.field(), AuthField::Username);
/// ```
pub fn validate_registration(input: &RegistrationInput) -> Option<FieldError> {
    ValidRegistration::parse(input).err()
}
