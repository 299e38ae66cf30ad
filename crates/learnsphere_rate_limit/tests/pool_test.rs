use learnsphere_rate_limit::{Credential, CredentialPool};

#[test]
fn parse_trims_and_drops_empty_entries() -> anyhow::Result<()> {
    let pool = CredentialPool::parse("  alpha ,, beta,gamma  ,")?;
    assert_eq!(pool.len(), 3);
    assert_eq!(pool.current().1.expose(), "alpha");
    Ok(())
}

#[test]
fn parse_rejects_blank_input() {
    assert!(CredentialPool::parse("").is_err());
    assert!(CredentialPool::parse(" ,  , ").is_err());
}

#[test]
fn from_env_rejects_unset_variable() {
    let err = CredentialPool::from_env("LEARNSPHERE_TEST_SURELY_UNSET_VARIABLE").unwrap_err();
    assert!(err.message.contains("LEARNSPHERE_TEST_SURELY_UNSET_VARIABLE"));
}

#[test]
fn rotate_wraps_around() -> anyhow::Result<()> {
    let pool = CredentialPool::parse("a,b,c")?;
    assert_eq!(pool.rotate_from(0), 1);
    assert_eq!(pool.rotate_from(1), 2);
    assert_eq!(pool.rotate_from(2), 0);
    assert_eq!(pool.current_index(), 0);
    Ok(())
}

#[test]
fn stale_rotation_does_not_double_advance() -> anyhow::Result<()> {
    let pool = CredentialPool::parse("a,b,c")?;

    // Two callers both saw index 0 fail; only the first moves the cursor.
    assert_eq!(pool.rotate_from(0), 1);
    assert_eq!(pool.rotate_from(0), 1);
    assert_eq!(pool.current_index(), 1);
    Ok(())
}

#[test]
fn clones_share_the_cursor() -> anyhow::Result<()> {
    let pool = CredentialPool::parse("a,b")?;
    let clone = pool.clone();
    pool.rotate_from(0);
    assert_eq!(clone.current_index(), 1);
    assert_eq!(clone.current().1.expose(), "b");
    Ok(())
}

#[test]
fn independent_pools_do_not_interfere() -> anyhow::Result<()> {
    let first = CredentialPool::parse("a,b")?;
    let second = CredentialPool::parse("a,b")?;
    first.rotate_from(0);
    assert_eq!(second.current_index(), 0);
    Ok(())
}

#[test]
fn credentials_are_redacted() -> anyhow::Result<()> {
    let pool = CredentialPool::parse("super-secret-key")?;
    assert!(!format!("{:?}", pool).contains("super-secret-key"));
    assert_eq!(format!("{}", Credential::new("super-secret-key")), "***");
    Ok(())
}
