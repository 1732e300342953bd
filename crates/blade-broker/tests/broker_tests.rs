#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use blade_broker::mock::MockEndpoint;
    use blade_broker::{ExchangeState, MessageBroker, MockRemote};
    use blade_core::BladeMsg;

    fn broker(identity: &str, remote: &Arc<MockRemote>) -> MessageBroker {
        MessageBroker::new(identity, remote.clone())
    }

    // ── refresh ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_refresh_picks_own_request() {
        let remote = Arc::new(MockRemote::new().with_requests(vec![
            BladeMsg::new("kitchen", "lights on"),
            BladeMsg::new("den", "x"),
        ]));
        let broker = broker("kitchen", &remote);

        broker.refresh().await.unwrap();
        assert_eq!(
            broker.current_request(),
            Some(BladeMsg::new("kitchen", "lights on"))
        );
        assert!(broker.current_response().is_none());
        assert_eq!(remote.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_then_send_goes_out() {
        let remote = Arc::new(
            MockRemote::new().with_requests(vec![BladeMsg::new("kitchen", "lights on")]),
        );
        let broker = broker("kitchen", &remote);

        broker.refresh().await.unwrap();
        assert!(broker.send_response("ok").await);
        assert_eq!(remote.posted(), vec![BladeMsg::new("kitchen", "ok")]);
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_cache() {
        let remote = Arc::new(
            MockRemote::new()
                .with_requests(vec![BladeMsg::new("kitchen", "lights on")])
                .with_responses(vec![BladeMsg::new("kitchen", "done")]),
        );
        let broker = broker("kitchen", &remote);
        broker.refresh().await.unwrap();
        assert!(broker.current_request().is_some());
        assert!(broker.current_response().is_some());

        remote.set_requests(MockEndpoint::Status(500));
        remote.set_responses(MockEndpoint::Status(500));
        assert!(broker.refresh().await.is_err());
        assert_eq!(broker.snapshot(), ExchangeState::default());
    }

    #[tokio::test]
    async fn test_refresh_one_side_failing_is_failure() {
        let remote = Arc::new(
            MockRemote::new().with_requests(vec![BladeMsg::new("kitchen", "lights on")]),
        );
        remote.set_responses(MockEndpoint::Status(404));
        let broker = broker("kitchen", &remote);

        let err = broker.refresh().await.unwrap_err();
        assert!(err.to_string().contains("404"));
        assert!(broker.current_request().is_none());
    }

    #[tokio::test]
    async fn test_refresh_reads_responses_when_requests_fail() {
        let remote = Arc::new(
            MockRemote::new().with_responses(vec![BladeMsg::new("kitchen", "done")]),
        );
        remote.set_requests(MockEndpoint::Status(503));
        let broker = broker("kitchen", &remote);

        let err = broker.refresh().await.unwrap_err();
        assert!(err.to_string().contains("503"));
        // Both endpoints were contacted
        assert_eq!(remote.fetch_calls(), 2);
        assert_eq!(broker.snapshot(), ExchangeState::default());
    }

    #[tokio::test]
    async fn test_refresh_overwrites_previous_pair() {
        let remote = Arc::new(
            MockRemote::new().with_requests(vec![BladeMsg::new("kitchen", "one")]),
        );
        let broker = broker("kitchen", &remote);
        broker.refresh().await.unwrap();

        remote.set_requests(MockEndpoint::Ok(vec![BladeMsg::new("den", "two")]));
        let state = broker.refresh().await.unwrap();
        assert!(state.request.is_none());
        assert!(broker.current_request().is_none());
    }

    // ── send_response guard ────────────────────────────────────

    #[tokio::test]
    async fn test_send_blocked_while_response_cached() {
        let remote = Arc::new(
            MockRemote::new().with_responses(vec![BladeMsg::new("kitchen", "earlier")]),
        );
        let broker = broker("kitchen", &remote);
        broker.refresh().await.unwrap();

        assert!(!broker.send_response("again").await);
        assert!(remote.posted().is_empty());
    }

    #[tokio::test]
    async fn test_other_blades_responses_do_not_block() {
        let remote = Arc::new(
            MockRemote::new().with_responses(vec![BladeMsg::new("den", "theirs")]),
        );
        let broker = broker("kitchen", &remote);
        broker.refresh().await.unwrap();

        assert!(broker.send_response("mine").await);
        assert_eq!(remote.posted().len(), 1);
    }

    #[tokio::test]
    async fn test_two_sends_without_refresh_both_go_out() {
        let remote = Arc::new(MockRemote::new());
        let broker = broker("kitchen", &remote);

        assert!(broker.send_response("a").await);
        assert!(broker.send_response("a").await);
        assert_eq!(remote.posted().len(), 2);
    }

    #[tokio::test]
    async fn test_send_failure_returns_false() {
        let remote = Arc::new(MockRemote::new().with_post_status(500));
        let broker = broker("kitchen", &remote);

        assert!(!broker.send_response("x").await);
        // Exactly one attempt was made
        assert_eq!(remote.posted().len(), 1);
    }

    #[tokio::test]
    async fn test_announce_sends_postblade() {
        let remote = Arc::new(MockRemote::new());
        let broker = broker("kitchen", &remote);

        assert!(broker.announce().await);
        assert_eq!(remote.posted(), vec![BladeMsg::new("kitchen", "--postblade")]);
    }

    #[tokio::test]
    async fn test_close_releases_remote() {
        let remote = Arc::new(MockRemote::new());
        let broker = broker("kitchen", &remote);

        broker.close();
        assert!(remote.is_closed());
        assert!(!broker.send_response("late").await);
        assert!(broker.refresh().await.is_err());
    }
}
