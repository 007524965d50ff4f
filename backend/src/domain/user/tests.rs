//! Tests for user identity newtypes.

use super::*;
use rstest::rstest;

#[rstest]
#[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
#[case("", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
#[case("ali@ce", UserValidationError::UsernameContainsAt)]
fn username_rejects_policy_violations(
    #[case] raw: &str,
    #[case] expected: UserValidationError,
) {
    assert_eq!(Username::new(raw).expect_err("invalid username"), expected);
}

#[rstest]
#[case("bob")]
#[case("ÅÆØ")]
#[case("alice_in_chains")]
fn username_accepts_three_or_more_characters(#[case] raw: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), raw);
}

#[rstest]
#[case("alice@example.com")]
#[case("a@b")]
#[case("first.last+tag@sub.domain.org")]
fn email_accepts_basic_shape(#[case] raw: &str) {
    assert!(EmailAddress::new(raw).is_ok());
}

#[rstest]
#[case("")]
#[case("alice")]
#[case("@example.com")]
#[case("alice@")]
#[case("a@b@c")]
#[case("al ice@example.com")]
fn email_rejects_malformed_values(#[case] raw: &str) {
    assert_eq!(
        EmailAddress::new(raw).expect_err("invalid email"),
        UserValidationError::InvalidEmail
    );
}

#[rstest]
#[case("")]
#[case("not-a-uuid")]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
fn user_id_rejects_invalid_input(#[case] raw: &str) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::InvalidId));
}

#[rstest]
fn user_id_serialises_as_string() {
    let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    let value = serde_json::to_value(id).expect("serialise id");
    assert_eq!(value, serde_json::json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
}

#[rstest]
fn display_name_is_trimmed() {
    assert_eq!(DisplayName::new("  Ada Lovelace ").as_ref(), "Ada Lovelace");
}

#[rstest]
fn with_profile_image_replaces_reference() {
    let user = User::new(UserDraft {
        id: UserId::random(),
        username: Username::new("alice").expect("username"),
        email: EmailAddress::new("alice@example.com").expect("email"),
        display_name: DisplayName::new("Alice"),
        profile_image: None,
        created_at: Utc::now(),
    });
    let url = ProfileImageUrl::parse("https://cdn.example.com/profile/a.png").expect("url");

    let updated = user.with_profile_image(url.clone());

    assert_eq!(updated.profile_image(), Some(&url));
}
