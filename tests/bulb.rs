mod tests {
    use adalight_smooth::bulb::{
        BulbConfig, BulbError, BulbPayload, BulbTransport, BulbWorker, SubmitOutcome,
        brightness_heuristic,
    };
    use adalight_smooth::{Duration, Instant, Rgb12};

    #[derive(Debug, Default)]
    struct MockBridge {
        fail: bool,
        sent: Vec<BulbPayload>,
    }

    impl BulbTransport for MockBridge {
        fn put(&mut self, payload: &BulbPayload) -> Result<(), BulbError> {
            if self.fail {
                return Err(BulbError::Transport);
            }
            self.sent.push(*payload);
            Ok(())
        }
    }

    const WHITE: Rgb12 = Rgb12 {
        r: 4095,
        g: 4095,
        b: 4095,
    };

    fn worker() -> BulbWorker<MockBridge> {
        BulbWorker::new(MockBridge::default(), BulbConfig::default())
    }

    #[test]
    fn test_white_payload() {
        let payload = BulbPayload::from_colors(&[WHITE, WHITE], &BulbConfig::default());
        assert!((payload.x - 0.3127).abs() < 1e-3, "{payload:?}");
        assert!((payload.y - 0.3290).abs() < 1e-3, "{payload:?}");
        assert_eq!(payload.brightness, 255);
        assert_eq!(payload.transition_time, 1);
    }

    #[test]
    fn test_black_payload() {
        let payload = BulbPayload::from_colors(&[Rgb12::default()], &BulbConfig::default());
        assert_eq!(payload.x, 0.0);
        assert_eq!(payload.y, 0.0);
        assert_eq!(payload.brightness, 0);
    }

    #[test]
    fn test_brightness_heuristic() {
        assert_eq!(brightness_heuristic(0.0, 30), 0);
        assert_eq!(brightness_heuristic(15.0, 30), 128);
        assert_eq!(brightness_heuristic(30.0, 30), 255);
        assert_eq!(brightness_heuristic(90.0, 30), 255);
    }

    #[test]
    fn test_payload_json() {
        let payload = BulbPayload {
            x: 0.3127,
            y: 0.329,
            brightness: 200,
            transition_time: 1,
        };
        let json = payload.to_json().unwrap();
        assert_eq!(
            json.as_str(),
            r#"{"xy":[0.3127,0.3290],"transitiontime":1,"bri":200}"#
        );
    }

    #[test]
    fn test_drops_while_busy() {
        let mut worker = worker();
        let first = worker.submit(&[WHITE], Instant::from_millis(0)).unwrap();
        assert!(matches!(first, SubmitOutcome::Sent(_)));
        assert!(worker.is_busy());

        let second = worker.submit(&[WHITE], Instant::from_millis(100)).unwrap();
        assert_eq!(second, SubmitOutcome::DroppedBusy);
        assert_eq!(worker.transport().sent.len(), 1);

        worker.complete();
        assert!(!worker.is_busy());
        let third = worker.submit(&[WHITE], Instant::from_millis(200)).unwrap();
        assert!(matches!(third, SubmitOutcome::Sent(_)));
        assert_eq!(worker.transport().sent.len(), 2);
    }

    #[test]
    fn test_outstanding_request_times_out() {
        let config = BulbConfig {
            response_timeout: Duration::from_millis(500),
            ..BulbConfig::default()
        };
        let mut worker = BulbWorker::new(MockBridge::default(), config);
        worker.submit(&[WHITE], Instant::from_millis(0)).unwrap();

        assert!(!worker.poll(Instant::from_millis(499)));
        assert_eq!(
            worker.submit(&[WHITE], Instant::from_millis(499)).unwrap(),
            SubmitOutcome::DroppedBusy
        );

        let outcome = worker.submit(&[WHITE], Instant::from_millis(500)).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Sent(_)));
        assert_eq!(worker.transport().sent.len(), 2);
    }

    #[test]
    fn test_transport_failure_leaves_worker_idle() {
        let bridge = MockBridge {
            fail: true,
            ..MockBridge::default()
        };
        let mut worker = BulbWorker::new(bridge, BulbConfig::default());
        assert_eq!(
            worker.submit(&[WHITE], Instant::from_millis(0)),
            Err(BulbError::Transport)
        );
        assert!(!worker.is_busy());
    }
}
