use super::*;
use crate::domain::{ObjectKey, SessionId, UploadFilename, UserId};
use actix_rt::System;
use rstest::rstest;

#[rstest]
#[case(
    UserPersistenceError::connection("refused"),
    "user store connection failed: refused"
)]
#[case(UserPersistenceError::query("syntax"), "user store query failed: syntax")]
fn user_persistence_errors_render(#[case] error: UserPersistenceError, #[case] expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[rstest]
fn persistence_error_lifts_into_insert_error() {
    let insert: UserInsertError = UserPersistenceError::query("boom").into();
    assert!(matches!(insert, UserInsertError::Persistence(_)));
    assert_eq!(insert.to_string(), "user store query failed: boom");
}

#[rstest]
fn unique_violation_collects_columns() {
    let err = UserInsertError::unique_violation([UniqueUserColumn::Email]);
    assert_eq!(
        err,
        UserInsertError::UniqueViolation {
            columns: vec![UniqueUserColumn::Email]
        }
    );
}

#[rstest]
fn session_store_mock_reports_missing_session() {
    let mut store = MockSessionStore::new();
    store.expect_read().times(1).return_once(|_| Ok(None));

    System::new().block_on(async move {
        let found = store
            .read(&SessionId::generate())
            .await
            .expect("read succeeds");
        assert!(found.is_none());
    });
}

#[rstest]
fn object_store_mock_surfaces_unavailability() {
    let mut store = MockObjectStore::new();
    store
        .expect_upload()
        .return_once(|_, _| Err(ObjectStoreError::unavailable("disk full")));
    let name = UploadFilename::new("a.png").expect("safe filename");
    let key = ObjectKey::profile_image(&UserId::random(), &name);

    System::new().block_on(async move {
        let err = store
            .upload(&key, vec![0_u8])
            .await
            .expect_err("upload fails");
        assert_eq!(err.to_string(), "object store unavailable: disk full");
    });
}
