//! Security Module Tests
//!
//! Tests for credential primitives, token verification, path containment,
//! validation and rate limiting.

#[cfg(test)]
mod credentials_tests {
    use crate::security::credentials::*;

    // Low work factor keeps the suite fast; production cost is validated
    // through config, not here.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_generate_token_length_and_charset() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_token_no_reuse() {
        let first = generate_token();
        let second = generate_token();
        assert_ne!(first, second);
    }

    #[test]
    fn test_generate_secret_length() {
        let secret = generate_secret();
        assert_eq!(secret.len(), SECRET_BYTES * 2);
    }

    #[test]
    fn test_hash_password_not_plaintext() {
        let hash = hash_password("testPassword123", TEST_COST).unwrap();
        assert_ne!(hash, "testPassword123");
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_hash_password_salted_but_both_verify() {
        let first = hash_password("testPassword123", TEST_COST).unwrap();
        let second = hash_password("testPassword123", TEST_COST).unwrap();

        assert_ne!(first, second);
        assert!(verify_password("testPassword123", &first));
        assert!(verify_password("testPassword123", &second));
    }

    #[test]
    fn test_verify_password_rejects_wrong_password() {
        let hash = hash_password("correct horse", TEST_COST).unwrap();
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn test_verify_password_rejects_garbage_digest() {
        assert!(!verify_password("anything", "not-a-bcrypt-digest"));
    }

    #[test]
    fn test_credential_record_roundtrip() {
        let record = CredentialRecord::from_password("hunter2hunter2", TEST_COST).unwrap();

        assert_eq!(record.algorithm, HashAlgorithm::Bcrypt);
        assert!(record.verify("hunter2hunter2"));
        assert!(!record.verify("hunter3hunter3"));
    }

    #[test]
    fn test_credential_store_authenticate() {
        let store = CredentialStore::new(TEST_COST);
        store.register("alice", "s3cret-passphrase").unwrap();

        assert!(store.authenticate("alice", "s3cret-passphrase"));
        assert!(!store.authenticate("alice", "wrong"));
        assert!(!store.authenticate("bob", "s3cret-passphrase"));
        assert_eq!(store.len(), 1);
    }
}

#[cfg(test)]
mod token_tests {
    use crate::error::AppError;
    use crate::security::token::*;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    const SECRET: &str = "test-secret-with-at-least-32-characters";

    fn verifier() -> JwtVerifier {
        JwtVerifier::hs256(SECRET)
    }

    #[test]
    fn test_verify_roundtrip_preserves_claims() {
        let issuer = TokenIssuer::new(SECRET, 3600);
        let token = issuer.issue("user123".to_string(), "user".to_string()).unwrap();

        let claims = verifier().verify(&token).unwrap();
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.role, "user");
        assert!(!claims.jti.is_empty());
        assert!(claims.exp > claims.iat);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_verify_rejects_mutated_signature() {
        let issuer = TokenIssuer::new(SECRET, 3600);
        let token = issuer.issue("user123".to_string(), "user".to_string()).unwrap();

        // Flip the last signature character to a different base64url char.
        let mut mutated = token.clone();
        let last = mutated.pop().unwrap();
        mutated.push(if last == 'A' { 'B' } else { 'A' });
        assert_ne!(token, mutated);

        let result = verifier().verify(&mutated);
        assert!(matches!(result, Err(AppError::AuthRejected)));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenIssuer::new("another-secret-with-32-characters!!", 3600);
        let token = issuer.issue("user123".to_string(), "user".to_string()).unwrap();

        let result = verifier().verify(&token);
        assert!(matches!(result, Err(AppError::AuthRejected)));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // exp two hours in the past, well beyond default leeway
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "user123".to_string(),
            role: "user".to_string(),
            exp: now - 7200,
            nbf: now - 10800,
            iat: now - 10800,
            jti: "test-jti".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = verifier().verify(&token);
        assert!(matches!(result, Err(AppError::AuthRejected)));
    }

    #[test]
    fn test_verify_rejects_algorithm_outside_allow_list() {
        // Same secret, but signed with HS384; the verifier only allows HS256.
        let claims = Claims::new("user123".to_string(), "user".to_string(), 3600);
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = verifier().verify(&token);
        assert!(matches!(result, Err(AppError::AuthRejected)));
    }

    #[test]
    fn test_verify_accepts_algorithm_inside_allow_list() {
        let claims = Claims::new("user123".to_string(), "user".to_string(), 3600);
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let verifier =
            JwtVerifier::new(SECRET, &[Algorithm::HS256, Algorithm::HS384]).unwrap();
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn test_verify_rejects_malformed_token() {
        for garbage in ["", "invalid", "invalid.jwt.token", "a.b"] {
            let result = verifier().verify(garbage);
            assert!(
                matches!(result, Err(AppError::AuthRejected)),
                "expected rejection for {:?}",
                garbage
            );
        }
    }

    #[test]
    fn test_empty_allow_list_is_config_error() {
        let result = JwtVerifier::new(SECRET, &[]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}

#[cfg(test)]
mod path_guard_tests {
    use crate::error::AppError;
    use crate::security::path_guard::*;
    use std::fs;
    use tempfile::TempDir;

    fn sandbox_with_file(name: &str, contents: &[u8]) -> (TempDir, FileSandbox) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(name), contents).unwrap();
        let sandbox = FileSandbox::new(temp.path()).unwrap();
        (temp, sandbox)
    }

    #[test]
    fn test_resolve_existing_file() {
        let (_temp, sandbox) = sandbox_with_file("report.txt", b"contents");

        let safe = sandbox.resolve("report.txt").unwrap();
        assert_eq!(safe.file_name().as_deref(), Some("report.txt"));
        assert_eq!(safe.read().unwrap(), b"contents");
        assert_eq!(safe.size().unwrap(), 8);
    }

    #[test]
    fn test_resolve_nested_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/inner.txt"), b"x").unwrap();
        let sandbox = FileSandbox::new(temp.path()).unwrap();

        assert!(sandbox.resolve("sub/inner.txt").is_ok());
    }

    #[test]
    fn test_rejects_parent_traversal() {
        let (_temp, sandbox) = sandbox_with_file("report.txt", b"contents");

        let result = sandbox.resolve("../../../etc/passwd");
        assert!(matches!(result, Err(AppError::PathRejected)));
    }

    #[test]
    fn test_rejects_embedded_traversal() {
        let (_temp, sandbox) = sandbox_with_file("report.txt", b"contents");

        let result = sandbox.resolve("sub/../../outside.txt");
        assert!(matches!(result, Err(AppError::PathRejected)));
    }

    #[test]
    fn test_rejects_missing_file() {
        let (_temp, sandbox) = sandbox_with_file("report.txt", b"contents");

        let result = sandbox.resolve("nonexistent.txt");
        assert!(matches!(result, Err(AppError::PathRejected)));
    }

    #[test]
    fn test_rejects_empty_and_null_segments() {
        let (_temp, sandbox) = sandbox_with_file("report.txt", b"contents");

        assert!(sandbox.resolve("").is_err());
        assert!(sandbox.resolve("re\0port.txt").is_err());
    }

    #[test]
    fn test_sibling_prefix_is_not_contained() {
        // /x/base must not contain /x/basement
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("base")).unwrap();
        fs::create_dir(temp.path().join("basement")).unwrap();
        fs::write(temp.path().join("basement/secret.txt"), b"secret").unwrap();
        let sandbox = FileSandbox::new(temp.path().join("base")).unwrap();

        let result = sandbox.resolve("../basement/secret.txt");
        assert!(matches!(result, Err(AppError::PathRejected)));
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_symlink_escape() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("target.txt"), b"outside").unwrap();

        let temp = TempDir::new().unwrap();
        symlink(outside.path().join("target.txt"), temp.path().join("link.txt")).unwrap();
        let sandbox = FileSandbox::new(temp.path()).unwrap();

        // Lexically inside the base, escapes through the symlink.
        let result = sandbox.resolve("link.txt");
        assert!(matches!(result, Err(AppError::PathRejected)));
    }

    #[test]
    fn test_missing_base_is_config_error() {
        let result = FileSandbox::new("/definitely/not/a/real/base/dir");
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}

#[cfg(test)]
mod validation_tests {
    use crate::security::validation::*;
    use rstest::rstest;

    fn input(name: &str, role: &str, permissions: &[&str]) -> UserInput {
        UserInput {
            name: name.to_string(),
            role: role.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_validate_accepts_clean_input() {
        let user = ValidatedUser::validate(&input("Alice", "admin", &["read", "write"])).unwrap();

        assert_eq!(user.name(), "Alice");
        assert_eq!(user.role(), Role::Admin);
        assert_eq!(user.permissions().len(), 2);
        assert!(user.permissions().contains(&Permission::Read));
        assert!(user.permissions().contains(&Permission::Write));
    }

    #[test]
    fn test_validate_strips_markup_from_name() {
        let user = ValidatedUser::validate(&input(
            "<b>Alice</b> <i>Smith</i>",
            "user",
            &["read"],
        ))
        .unwrap();

        assert_eq!(user.name(), "Alice Smith");
    }

    #[test]
    fn test_wildcard_permissions_rejected_even_with_valid_role() {
        // Name survives sanitization and the role is valid; the empty
        // filtered permission set still rejects the whole record.
        let result = ValidatedUser::validate(&input(
            "<script>alert(1)</script>",
            "admin",
            &["*"],
        ));

        assert_eq!(result, Err(ValidationError::NoValidPermissions));
    }

    #[test]
    fn test_markup_only_name_rejected() {
        let result = ValidatedUser::validate(&input("<script></script>", "user", &["read"]));
        assert_eq!(result, Err(ValidationError::InvalidName));
    }

    #[rstest]
    #[case("user", Role::User)]
    #[case("admin", Role::Admin)]
    #[case("moderator", Role::Moderator)]
    fn test_role_parse_accepts_fixed_set(#[case] value: &str, #[case] expected: Role) {
        assert_eq!(Role::parse(value).unwrap(), expected);
    }

    #[rstest]
    #[case("superuser")]
    #[case("ADMIN")]
    #[case("")]
    #[case("root")]
    fn test_role_parse_rejects_unknown(#[case] value: &str) {
        assert!(matches!(
            Role::parse(value),
            Err(ValidationError::InvalidRole { .. })
        ));
    }

    #[test]
    fn test_permissions_filtered_against_fixed_set() {
        let user = ValidatedUser::validate(&input(
            "Alice",
            "user",
            &["read", "write", "sudo", "delete", "chown"],
        ))
        .unwrap();

        assert_eq!(user.permissions().len(), 3);
        assert!(!user.to_input().permissions.contains(&"sudo".to_string()));
    }

    #[test]
    fn test_empty_permission_list_rejected() {
        let result = ValidatedUser::validate(&input("Alice", "user", &[]));
        assert_eq!(result, Err(ValidationError::NoValidPermissions));
    }

    #[test]
    fn test_validator_is_idempotent() {
        let first =
            ValidatedUser::validate(&input("  Alice <script>x</script> ", "moderator", &[
                "delete", "read",
            ]))
            .unwrap();

        let second = ValidatedUser::validate(&first.to_input()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sanitize_name_trims_and_drops_controls() {
        let name = sanitize_name("  Ali\x00ce\t ").unwrap();
        assert_eq!(name, "Alice");
    }

    #[test]
    fn test_sanitize_name_rejects_oversized() {
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            sanitize_name(&long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_ensure_json_object() {
        assert!(ensure_json_object(&serde_json::json!({"k": "v"})).is_ok());
        assert!(ensure_json_object(&serde_json::json!([1, 2])).is_err());
        assert!(ensure_json_object(&serde_json::json!("text")).is_err());
        assert!(ensure_json_object(&serde_json::json!(null)).is_err());
    }

    #[test]
    fn test_validate_length_bounds() {
        assert!(validate_length("name", "ok", 10).is_ok());
        assert!(matches!(
            validate_length("name", "", 10),
            Err(ValidationError::MissingField { .. })
        ));
        assert!(matches!(
            validate_length("name", "toolongvalue", 5),
            Err(ValidationError::TooLong { .. })
        ));
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use crate::security::rate_limit::*;

    fn limiter(max_requests: u32, window_seconds: u64) -> RateLimiter {
        RateLimiter::from_settings(max_requests, window_seconds, true)
    }

    #[tokio::test]
    async fn test_sixth_request_in_window_is_limited() {
        let limiter = limiter(5, 15 * 60);
        let client = RateLimitClient::from_ip("192.168.1.1");

        for i in 0..5 {
            let result = limiter.check(&client).await;
            assert!(
                matches!(result, RateLimitResult::Allowed { .. }),
                "request {} should be allowed",
                i + 1
            );
        }

        match limiter.check(&client).await {
            RateLimitResult::Limited { retry_after } => {
                assert!(retry_after > 0 && retry_after <= 15 * 60);
            }
            other => panic!("expected Limited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_window_elapse_resets_count() {
        let limiter = limiter(2, 1);
        let client = RateLimitClient::from_ip("192.168.1.1");

        assert!(matches!(
            limiter.check(&client).await,
            RateLimitResult::Allowed { remaining: 1 }
        ));
        assert!(matches!(
            limiter.check(&client).await,
            RateLimitResult::Allowed { remaining: 0 }
        ));
        assert!(matches!(
            limiter.check(&client).await,
            RateLimitResult::Limited { .. }
        ));

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        // Fresh window: the count restarts at one
        assert!(matches!(
            limiter.check(&client).await,
            RateLimitResult::Allowed { remaining: 1 }
        ));
    }

    #[tokio::test]
    async fn test_clients_are_isolated() {
        let limiter = limiter(1, 15 * 60);
        let first = RateLimitClient::from_ip("192.168.1.1");
        let second = RateLimitClient::from_ip("192.168.1.2");

        assert!(matches!(
            limiter.check(&first).await,
            RateLimitResult::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check(&first).await,
            RateLimitResult::Limited { .. }
        ));
        assert!(matches!(
            limiter.check(&second).await,
            RateLimitResult::Allowed { .. }
        ));
    }

    #[tokio::test]
    async fn test_disabled_limiter_always_allows() {
        let limiter = RateLimiter::disabled();
        let client = RateLimitClient::from_ip("192.168.1.1");

        for _ in 0..50 {
            assert!(matches!(
                limiter.check(&client).await,
                RateLimitResult::Allowed { .. }
            ));
        }
    }

    #[tokio::test]
    async fn test_concurrent_checks_do_not_lose_updates() {
        let limiter = limiter(5, 15 * 60);
        let client = RateLimitClient::from_subject("user123");

        let mut handles = Vec::new();
        for _ in 0..20 {
            let limiter = limiter.clone();
            let client = client.clone();
            handles.push(tokio::spawn(async move { limiter.check(&client).await }));
        }

        let mut allowed = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), RateLimitResult::Allowed { .. }) {
                allowed += 1;
            }
        }

        // Exactly the window allowance, no more
        assert_eq!(allowed, 5);
    }

    #[tokio::test]
    async fn test_clear_client_resets_window() {
        let limiter = limiter(1, 15 * 60);
        let client = RateLimitClient::from_ip("192.168.1.1");

        let _ = limiter.check(&client).await;
        assert!(matches!(
            limiter.check(&client).await,
            RateLimitResult::Limited { .. }
        ));

        limiter.clear_client(&client).await;
        assert!(matches!(
            limiter.check(&client).await,
            RateLimitResult::Allowed { .. }
        ));
        assert_eq!(limiter.tracked_clients().await, 1);
    }
}

#[cfg(test)]
mod settings_tests {
    use crate::security::config::*;

    #[test]
    fn test_development_settings() {
        let settings = SecuritySettings::development();

        assert!(settings.has_jwt_secret());
        assert!(!settings.rate_limit_enabled);
        assert_eq!(settings.login_max_requests, 5);
        assert_eq!(settings.login_window_seconds, 15 * 60);
    }

    #[test]
    fn test_production_settings() {
        let settings = SecuritySettings::production();

        assert!(settings.rate_limit_enabled);
        assert!(settings.security_headers_enabled);
        assert!(!settings.has_jwt_secret());
    }

    #[test]
    fn test_cookie_policy_is_hardened() {
        let policy = CookiePolicy::strict("session-id");

        assert!(policy.secure);
        assert!(policy.http_only);
        assert_eq!(policy.same_site, SameSite::Strict);
        assert_eq!(policy.max_age_seconds, 24 * 60 * 60);
    }
}
