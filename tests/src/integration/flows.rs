//! # Integration Test Flows
//!
//! End-to-end calls through the in-memory host, one test group per
//! guarantee the façade makes:
//!
//! 1. **Resolution**: invoke resolves to exactly what the handler returned
//! 2. **Missing handlers**: invoke rejects instead of hanging
//! 3. **Re-registration**: the most recent handler wins
//! 4. **Descriptor parity**: descriptor and string-name paths behave the same
//! 5. **Failures**: handler errors and panics reject the caller's future
//! 6. **Async handlers**: the inner future is awaited before resolving

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use futures::future::join_all;
    use tokio::time::{timeout, Instant};

    use typed_ipc::{
        handle, handle_sync, invoke, invoke_ipc_channel, register_ipc_channel,
        register_ipc_channel_sync, DuplicatePolicy, HandlerError, HostConfig, InMemoryHost,
        InvokeError, IpcChannel, RegistrationError,
    };

    use ipc_telemetry::TelemetryError;

    use crate::integration::contract::{
        init_service_logging, serve, SettingsError, SERVICE_NAME, SettingsStore, DELAYED_ECHO, EQUALS, GET_SETTING, LIST_SETTINGS,
        SET_SETTING, SUM,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const CALL_TIMEOUT: Duration = Duration::from_secs(2);

    /// Host serving the settings contract with two preset values.
    fn serving_host() -> InMemoryHost {
        let host = InMemoryHost::new();
        let store = SettingsStore::with_values([
            ("theme".to_string(), "dark".to_string()),
            ("system.version".to_string(), "1.0".to_string()),
        ]);
        serve(&host, store).expect("contract registers");
        host
    }

    // =============================================================================
    // RESOLUTION
    // =============================================================================

    #[tokio::test]
    async fn test_sum_example_scenario() {
        let host = serving_host();

        let total = invoke_ipc_channel(&host, &SUM, (2, 3)).await.unwrap();
        assert_eq!(total, 5);

        let err = invoke::<_, _, ()>(&host, "unknown", ()).await.unwrap_err();
        assert!(matches!(err, InvokeError::NoHandler { ref channel } if channel == "unknown"));
    }

    #[tokio::test]
    async fn test_settings_round_trip_between_endpoints() {
        let host = serving_host();
        let renderer = host.invoker(1);

        let theme = invoke_ipc_channel(&renderer, &GET_SETTING, ("theme".to_string(),))
            .await
            .unwrap();
        assert_eq!(theme.as_deref(), Some("dark"));

        invoke_ipc_channel(
            &renderer,
            &SET_SETTING,
            ("font".to_string(), "mono".to_string()),
        )
        .await
        .unwrap();

        // A different endpoint sees the write.
        let other = host.invoker(2);
        let font = invoke_ipc_channel(&other, &GET_SETTING, ("font".to_string(),))
            .await
            .unwrap();
        assert_eq!(font.as_deref(), Some("mono"));

        let keys = invoke_ipc_channel(&other, &LIST_SETTINGS, ()).await.unwrap();
        assert_eq!(keys, vec!["font", "system.version", "theme"]);
    }

    #[tokio::test]
    async fn test_missing_setting_is_none() {
        let host = serving_host();
        let value = invoke_ipc_channel(&host, &GET_SETTING, ("nope".to_string(),))
            .await
            .unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_equals_channel() {
        let host = serving_host();
        let same = invoke_ipc_channel(&host, &EQUALS, ("a".to_string(), "a".to_string()))
            .await
            .unwrap();
        let different = invoke_ipc_channel(&host, &EQUALS, ("a".to_string(), "b".to_string()))
            .await
            .unwrap();
        assert!(same);
        assert!(!different);
    }

    #[tokio::test]
    async fn test_serving_with_service_logging() {
        // Only this test installs a subscriber, but tolerate a prior one.
        match init_service_logging() {
            Ok(config) => assert_eq!(config.service_name, SERVICE_NAME),
            Err(TelemetryError::Init(_)) => {}
            Err(other) => panic!("logging config rejected: {other}"),
        }

        let host = serving_host();
        invoke_ipc_channel(&host, &SET_SETTING, ("lang".to_string(), "en".to_string()))
            .await
            .unwrap();
        let lang = invoke_ipc_channel(&host, &GET_SETTING, ("lang".to_string(),))
            .await
            .unwrap();
        assert_eq!(lang.as_deref(), Some("en"));
    }

    // =============================================================================
    // MISSING HANDLERS
    // =============================================================================

    #[tokio::test]
    async fn test_unregistered_channel_rejects_without_hanging() {
        let host = InMemoryHost::new();

        let result = timeout(CALL_TIMEOUT, invoke_ipc_channel(&host, &SUM, (1, 1)))
            .await
            .expect("no-handler call must settle");

        let err = result.unwrap_err();
        assert!(err.is_no_handler());
        assert_eq!(err.channel(), "sum");
    }

    // =============================================================================
    // RE-REGISTRATION
    // =============================================================================

    #[tokio::test]
    async fn test_last_registration_wins() {
        let host = InMemoryHost::new();
        let version: IpcChannel<(), u32> = IpcChannel::new("version");

        register_ipc_channel_sync(&host, &version, |_event, ()| Ok(1)).unwrap();
        register_ipc_channel_sync(&host, &version, |_event, ()| Ok(2)).unwrap();

        for _ in 0..3 {
            assert_eq!(invoke_ipc_channel(&host, &version, ()).await.unwrap(), 2);
        }
        assert_eq!(host.handler_count(), 1);
    }

    #[tokio::test]
    async fn test_reject_policy_surfaces_duplicate() {
        let host = InMemoryHost::with_config(
            HostConfig::default().with_duplicate_policy(DuplicatePolicy::Reject),
        );
        serve(&host, SettingsStore::default()).unwrap();

        let err = serve(&host, SettingsStore::default()).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateHandler {
                channel: SUM.name().to_string()
            }
        );
    }

    // =============================================================================
    // DESCRIPTOR PARITY
    // =============================================================================

    #[tokio::test]
    async fn test_descriptor_path_matches_string_path() {
        let by_descriptor = InMemoryHost::new();
        let by_name = InMemoryHost::new();

        register_ipc_channel(&by_descriptor, &EQUALS, |_event, (a, b)| async move {
            Ok(a.eq_ignore_ascii_case(&b))
        })
        .unwrap();
        handle(
            &by_name,
            EQUALS.name(),
            |_event, (a, b): (String, String)| async move { Ok(a.eq_ignore_ascii_case(&b)) },
        )
        .unwrap();

        let cases = [("Rust", "rust"), ("a", "b"), ("", "")];
        for (a, b) in cases {
            let args = (a.to_string(), b.to_string());
            let typed = invoke_ipc_channel(&by_descriptor, &EQUALS, args.clone())
                .await
                .unwrap();
            let untyped: bool = invoke(&by_name, EQUALS.name(), args).await.unwrap();
            assert_eq!(typed, untyped, "mismatch for ({a:?}, {b:?})");
        }

        // Cross over: descriptor call against a string-registered handler.
        let crossed = invoke_ipc_channel(&by_name, &EQUALS, ("X".to_string(), "x".to_string()))
            .await
            .unwrap();
        assert!(crossed);
    }

    // =============================================================================
    // FAILURES
    // =============================================================================

    #[tokio::test]
    async fn test_handler_error_reaches_caller_unchanged() {
        let host = serving_host();

        let err = invoke_ipc_channel(
            &host,
            &SET_SETTING,
            ("system.version".to_string(), "2.0".to_string()),
        )
        .await
        .unwrap_err();

        let settings_err = err
            .handler_error()
            .and_then(|e| e.downcast_ref::<SettingsError>())
            .expect("settings error");
        assert_eq!(
            settings_err,
            &SettingsError::ReadOnly("system.version".to_string())
        );

        // The rejected write left the value untouched.
        let value = invoke_ipc_channel(&host, &GET_SETTING, ("system.version".to_string(),))
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("1.0"));
    }

    #[tokio::test]
    async fn test_panicking_handler_rejects_and_host_survives() {
        let host = serving_host();
        handle_sync(&host, "explode", |_event, (): ()| -> anyhow::Result<()> {
            panic!("handler exploded")
        })
        .unwrap();

        let err = invoke::<_, _, ()>(&host, "explode", ()).await.unwrap_err();
        assert!(matches!(
            err,
            InvokeError::Handler {
                source: HandlerError::Panicked { ref message },
                ..
            } if message == "handler exploded"
        ));

        assert_eq!(invoke_ipc_channel(&host, &SUM, (4, 4)).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_argument_mismatch_surfaces_from_handler() {
        let host = serving_host();

        // Same name, wrong argument tuple on the calling side.
        let wrong: IpcChannel<(String,), i64> = IpcChannel::new(SUM.name());
        let err = invoke_ipc_channel(&host, &wrong, ("2".to_string(),))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InvokeError::Handler {
                source: HandlerError::Arguments(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_result_type_mismatch_is_decode_error() {
        let host = serving_host();

        let wrong: IpcChannel<(i64, i64), String> = IpcChannel::new(SUM.name());
        let err = invoke_ipc_channel(&host, &wrong, (1, 2)).await.unwrap_err();
        assert!(matches!(err, InvokeError::Decode { .. }));
    }

    // =============================================================================
    // ASYNC HANDLERS
    // =============================================================================

    #[tokio::test]
    async fn test_async_handler_result_is_awaited() {
        let host = serving_host();

        let started = Instant::now();
        let echoed = invoke_ipc_channel(&host, &DELAYED_ECHO, (50, "late".to_string()))
            .await
            .unwrap();

        assert_eq!(echoed, "late");
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_concurrent_calls_resolve_independently() {
        let host = serving_host();

        // Slowest first; each call still gets its own result.
        let calls = [(120u64, "a"), (60, "b"), (0, "c")].map(|(delay, text)| {
            invoke_ipc_channel(&host, &DELAYED_ECHO, (delay, text.to_string()))
        });

        let results = timeout(CALL_TIMEOUT, join_all(calls)).await.unwrap();
        let texts: Vec<String> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_completion_order_follows_handler_latency() {
        let host = serving_host();
        let finished = Arc::new(AtomicUsize::new(0));

        let slow = {
            let host = host.clone();
            let finished = finished.clone();
            tokio::spawn(async move {
                let out = invoke_ipc_channel(&host, &DELAYED_ECHO, (150, "slow".to_string()))
                    .await
                    .unwrap();
                (out, finished.fetch_add(1, Ordering::SeqCst))
            })
        };
        let fast = {
            let host = host.clone();
            let finished = finished.clone();
            tokio::spawn(async move {
                let out = invoke_ipc_channel(&host, &DELAYED_ECHO, (0, "fast".to_string()))
                    .await
                    .unwrap();
                (out, finished.fetch_add(1, Ordering::SeqCst))
            })
        };

        let (slow, fast) = (slow.await.unwrap(), fast.await.unwrap());
        assert_eq!(fast, ("fast".to_string(), 0));
        assert_eq!(slow, ("slow".to_string(), 1));
    }

    #[tokio::test]
    async fn test_invocations_counted() {
        let host = serving_host();
        for i in 0..5 {
            invoke_ipc_channel(&host, &SUM, (i, i)).await.unwrap();
        }
        let _ = invoke::<_, _, ()>(&host, "unknown", ()).await;

        assert_eq!(host.invocations_dispatched(), 5);
    }
}
