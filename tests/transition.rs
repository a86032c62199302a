mod tests {
    use adalight_smooth::color::{Lab, Rgb12, SRGB12};
    use adalight_smooth::transition::{DEFAULT_TRANSITION_TICKS, LedTransition, TransitionEngine};

    const BLACK: Rgb12 = Rgb12 { r: 0, g: 0, b: 0 };
    const WHITE: Rgb12 = Rgb12 {
        r: 4095,
        g: 4095,
        b: 4095,
    };
    const ORANGE: Rgb12 = Rgb12 {
        r: 4095,
        g: 1700,
        b: 80,
    };
    const TEAL: Rgb12 = Rgb12 {
        r: 100,
        g: 2500,
        b: 2400,
    };
    const VIOLET: Rgb12 = Rgb12 {
        r: 2600,
        g: 300,
        b: 3900,
    };

    fn axes(lab: Lab) -> [f64; 3] {
        [lab.l, lab.a, lab.b]
    }

    fn engine_at(color: Rgb12) -> TransitionEngine<4> {
        let mut engine = TransitionEngine::new(DEFAULT_TRANSITION_TICKS);
        engine.initialize(&[color]);
        engine
    }

    #[test]
    fn test_initialize_is_at_rest() {
        let engine = engine_at(ORANGE);
        let led = engine.leds()[0];
        assert_eq!(led.current(), led.target());
        assert_eq!(led.step(), Lab::default());
        assert_eq!(led.output(), ORANGE);
        assert!(!engine.is_transitioning());
    }

    #[test]
    fn test_converges_in_exactly_fifteen_ticks() {
        let pairs = [
            (BLACK, WHITE),
            (WHITE, BLACK),
            (ORANGE, TEAL),
            (TEAL, VIOLET),
            (VIOLET, ORANGE),
        ];
        for (from, to) in pairs {
            let mut engine = engine_at(from);
            assert_eq!(engine.set_target(&[to]), 1);

            for _ in 0..14 {
                engine.tick();
            }
            assert!(engine.is_transitioning());

            engine.tick();
            let led = engine.leds()[0];
            assert!(!engine.is_transitioning());
            assert_eq!(led.current(), led.target());
            assert_eq!(led.current(), SRGB12.rgb_to_lab(to));
            assert_eq!(led.output(), to);
        }
    }

    #[test]
    fn test_never_overshoots() {
        let mut engine = engine_at(VIOLET);
        engine.set_target(&[TEAL]);
        let target = axes(engine.leds()[0].target());
        let start = axes(engine.leds()[0].current());
        let mut previous = [0.0; 3];
        for axis in 0..3 {
            previous[axis] = (target[axis] - start[axis]).abs();
        }

        for _ in 0..DEFAULT_TRANSITION_TICKS {
            engine.tick();
            let current = axes(engine.leds()[0].current());
            for axis in 0..3 {
                let distance = (target[axis] - current[axis]).abs();
                assert!(distance <= previous[axis]);
                // still on the starting side of the target
                let before = start[axis] - target[axis];
                let now = current[axis] - target[axis];
                assert!(now == 0.0 || before.signum() == now.signum());
                previous[axis] = distance;
            }
        }
    }

    #[test]
    fn test_step_is_non_negative() {
        let mut engine = engine_at(WHITE);
        engine.set_target(&[BLACK]);
        let step = engine.leds()[0].step();
        assert!(step.l > 0.0);
        assert!(step.a >= 0.0);
        assert!(step.b >= 0.0);
    }

    #[test]
    fn test_redirect_mid_transition() {
        let mut engine = engine_at(BLACK);
        engine.set_target(&[ORANGE]);
        for _ in 0..5 {
            engine.tick();
        }
        let at_five = engine.leds()[0].current();

        assert_eq!(engine.set_target(&[TEAL]), 1);
        let teal = SRGB12.rgb_to_lab(TEAL);
        let step = engine.leds()[0].step();
        assert_eq!(step.l, (teal.l - at_five.l).abs() / 15.0);
        assert_eq!(step.a, (teal.a - at_five.a).abs() / 15.0);
        assert_eq!(step.b, (teal.b - at_five.b).abs() / 15.0);

        for _ in 0..15 {
            engine.tick();
        }
        let led = engine.leds()[0];
        assert_eq!(led.current(), teal);
        assert_eq!(led.output(), TEAL);
    }

    #[test]
    fn test_same_target_does_not_restart() {
        let mut engine = engine_at(BLACK);
        engine.set_target(&[WHITE]);
        for _ in 0..10 {
            engine.tick();
        }
        let step = engine.leds()[0].step();
        assert_eq!(engine.set_target(&[WHITE]), 0);
        assert_eq!(engine.leds()[0].step(), step);

        for _ in 0..5 {
            engine.tick();
        }
        assert!(!engine.is_transitioning());
        assert_eq!(engine.leds()[0].output(), WHITE);
    }

    #[test]
    fn test_tick_after_convergence_is_noop() {
        let mut engine = engine_at(TEAL);
        engine.set_target(&[VIOLET]);
        for _ in 0..15 {
            engine.tick();
        }
        let settled = engine.leds()[0];
        engine.tick();
        engine.tick();
        assert_eq!(engine.leds()[0], settled);
    }

    #[test]
    fn test_only_changed_leds_are_retargeted() {
        let mut engine: TransitionEngine<4> = TransitionEngine::new(DEFAULT_TRANSITION_TICKS);
        engine.initialize(&[BLACK, WHITE, TEAL]);
        assert_eq!(engine.set_target(&[BLACK, ORANGE, TEAL]), 1);
        assert!(!engine.leds()[0].is_transitioning());
        assert!(engine.leds()[1].is_transitioning());
        assert!(!engine.leds()[2].is_transitioning());
    }

    #[test]
    fn test_resize_keeps_last_output() {
        let mut engine: TransitionEngine<4> = TransitionEngine::new(DEFAULT_TRANSITION_TICKS);
        engine.initialize(&[BLACK, BLACK]);
        engine.set_target(&[WHITE, ORANGE]);
        for _ in 0..3 {
            engine.tick();
        }
        let outputs: Vec<Rgb12> = engine.outputs().collect();

        engine.resize(3);
        assert_eq!(engine.len(), 3);
        assert!(!engine.is_transitioning());
        assert_eq!(engine.leds()[0].output(), outputs[0]);
        assert_eq!(engine.leds()[1].output(), outputs[1]);
        assert_eq!(engine.leds()[2].output(), BLACK);
    }

    #[test]
    fn test_set_target_with_new_count_resizes() {
        let mut engine = engine_at(WHITE);
        engine.set_target(&[WHITE, ORANGE]);
        assert_eq!(engine.len(), 2);
        // first LED was already white
        assert!(!engine.leds()[0].is_transitioning());
        assert!(engine.leds()[1].is_transitioning());
    }

    #[test]
    fn test_capacity_limits_led_count() {
        let mut engine: TransitionEngine<2> = TransitionEngine::new(DEFAULT_TRANSITION_TICKS);
        assert_eq!(engine.initialize(&[WHITE, WHITE, WHITE]), 2);
        engine.set_target(&[BLACK, BLACK, BLACK, BLACK]);
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_custom_tick_count() {
        let mut engine: TransitionEngine<1> = TransitionEngine::new(4);
        engine.initialize(&[BLACK]);
        engine.set_target(&[VIOLET]);
        for _ in 0..4 {
            engine.tick();
        }
        assert_eq!(engine.leds()[0].output(), VIOLET);
    }

    #[test]
    fn test_single_led_transition() {
        let mut led = LedTransition::settled(BLACK);
        assert!(!led.retarget(BLACK, 15));
        assert!(led.retarget(WHITE, 15));
        led.tick();
        let first = led.output();
        assert!(first.r > 0 && first.r < 4095);
        assert!(first.r.abs_diff(first.g) <= 1);
        assert!(led.is_transitioning());
    }
}
