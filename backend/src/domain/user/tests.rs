//! Tests for the domain user model.

use super::*;
use rstest::rstest;

#[rstest]
#[case("admin@TEST.com", "admin@test.com")]
#[case("  Mixed.Case@Example.Org  ", "mixed.case@example.org")]
#[case("cook@kitchen.example.co.uk", "cook@kitchen.example.co.uk")]
fn email_is_trimmed_and_lowercased(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("no-at-sign.example.com", UserValidationError::InvalidEmail)]
#[case("two@@example.com", UserValidationError::InvalidEmail)]
#[case("missing@tld", UserValidationError::InvalidEmail)]
#[case("spaced out@example.com", UserValidationError::InvalidEmail)]
fn invalid_emails_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
    let err = EmailAddress::new(raw).expect_err("invalid email must fail");
    assert_eq!(err, expected);
}

#[rstest]
fn overlong_email_is_rejected() {
    let raw = format!("{}@example.com", "a".repeat(USER_FIELD_MAX));
    let err = EmailAddress::new(raw).expect_err("overlong email must fail");
    assert_eq!(
        err,
        UserValidationError::EmailTooLong {
            max: USER_FIELD_MAX
        }
    );
}

#[rstest]
fn name_may_be_empty() {
    let name = PersonName::new("   ").expect("blank names are allowed");
    assert_eq!(name.as_ref(), "");
}

#[rstest]
fn overlong_name_is_rejected() {
    let err = PersonName::new("n".repeat(USER_FIELD_MAX + 1)).expect_err("too long");
    assert_eq!(
        err,
        UserValidationError::NameTooLong {
            max: USER_FIELD_MAX
        }
    );
}

#[rstest]
#[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
#[case("not-a-uuid", false)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", false)]
fn user_id_parsing(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(UserId::new(raw).is_ok(), valid);
}

#[rstest]
fn superuser_flags_elevate_permissions() {
    let flags = AccountFlags::superuser();
    assert!(flags.is_active && flags.is_staff && flags.is_superuser);

    let regular = AccountFlags::regular();
    assert!(regular.is_active);
    assert!(!regular.is_staff && !regular.is_superuser);
}

#[rstest]
fn with_name_replaces_display_name() {
    let user = User::new(
        UserId::random(),
        EmailAddress::new("cook@example.com").expect("email"),
        PersonName::default(),
        AccountFlags::regular(),
    );
    let renamed = user.with_name(PersonName::new("Julia").expect("name"));
    assert_eq!(renamed.name().as_ref(), "Julia");
}
