//! Property tests for playback, PWM and the drawn profile buffer

use proptest::prelude::*;

use tremolo_core::config::{MAX_TIME_MS, MAX_VOLT, MIN_TIME_MS, MIN_VOLT, ON_TIME_MS, PROFILE_LEN};
use tremolo_core::profile::{ForceDistribution, ForceError};
use tremolo_core::pwm::PwmController;
use tremolo_core::ui::DrawnProfile;

/// Expected (voltage, hold time) pairs for a profile
fn expected(profile: &[u8], max: f32, interval: u16) -> Vec<(f32, u16)> {
    let mut out = Vec::new();
    let mut prev: Option<f32> = None;
    for &p in profile {
        let v = p as f32 * max / 100.0;
        out.push((v, interval));
        if let Some(prev) = prev {
            if prev - v < -0.6 * prev {
                out.push((-0.6 * max, 7));
            }
        }
        prev = Some(v);
    }
    out
}

/// Step through the whole sequence, one call per entry
fn play(engine: &mut ForceDistribution, start: u32) -> Vec<(f32, u16)> {
    let seq: Vec<u16> = engine.sequence().unwrap().times().collect();
    let mut now = start;
    let mut out = Vec::new();
    for hold in seq {
        out.push((engine.step(now).unwrap(), hold));
        now = now.wrapping_add(hold as u32);
    }
    assert_eq!(engine.step(now), Ok(0.0));
    assert!(engine.is_complete());
    out
}

fn profile_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..=100, 1..=PROFILE_LEN)
}

proptest! {
    #[test]
    fn playback_follows_profile_with_backstops(
        profile in profile_strategy(),
        max in MIN_VOLT..=MAX_VOLT,
        interval in MIN_TIME_MS..=MAX_TIME_MS,
        start in any::<u32>(),
    ) {
        let mut engine = ForceDistribution::new();
        engine.set_max_voltage(max).unwrap();
        engine.set_time_per_interval(interval).unwrap();
        engine.set_distribution(&profile).unwrap();

        prop_assert_eq!(play(&mut engine, start), expected(&profile, max, interval));
    }

    #[test]
    fn restart_replays_identically(
        profile in profile_strategy(),
        played in 0usize..50,
    ) {
        let mut engine = ForceDistribution::new();
        engine.set_distribution(&profile).unwrap();
        let first = play(&mut engine, 0);

        engine.restart_forcing().unwrap();
        let mut now = 10_000;
        for _ in 0..played {
            engine.step(now).unwrap();
            now += MAX_TIME_MS as u32;
        }

        engine.restart_forcing().unwrap();
        prop_assert_eq!(engine.current_index(), 0);
        prop_assert_eq!(play(&mut engine, now), first);
    }

    #[test]
    fn rejected_voltage_keeps_state(volts in prop_oneof![-100.0f32..4.99, 9.01f32..100.0]) {
        let mut engine = ForceDistribution::new();
        engine.set_max_voltage(8.0).unwrap();

        prop_assert_eq!(engine.set_max_voltage(volts), Err(ForceError::VoltageOutOfRange));
        prop_assert_eq!(engine.max_voltage(), 8.0);
    }

    #[test]
    fn rejected_interval_keeps_state(ms in prop_oneof![0u16..MIN_TIME_MS, (MAX_TIME_MS + 1)..=u16::MAX]) {
        let mut engine = ForceDistribution::new();
        engine.set_time_per_interval(20).unwrap();

        prop_assert_eq!(engine.set_time_per_interval(ms), Err(ForceError::IntervalOutOfRange));
        prop_assert_eq!(engine.time_per_interval(), 20);
    }

    #[test]
    fn rejected_profile_keeps_sequence(
        profile in profile_strategy(),
        bad in 101u8..=255,
        at in 0usize..PROFILE_LEN,
    ) {
        let mut engine = ForceDistribution::new();
        engine.set_distribution(&profile).unwrap();
        let before: Vec<f32> = engine.sequence().unwrap().forces().collect();

        let mut broken = profile.clone();
        let at = at % broken.len();
        broken[at] = bad;
        prop_assert_eq!(engine.set_distribution(&broken), Err(ForceError::PowerOutOfRange));

        let after: Vec<f32> = engine.sequence().unwrap().forces().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn pwm_high_time_matches_target(volts in -12.0f32..12.0, start in any::<u32>()) {
        let mut pwm = PwmController::new();
        pwm.stop(start);

        let mut forward = 0;
        let mut backward = 0;
        for t in 0..ON_TIME_MS {
            let levels = pwm.update(start.wrapping_add(t), volts);
            prop_assert!(!(levels.forward && levels.backward));
            forward += levels.forward as u32;
            backward += levels.backward as u32;
        }

        let clamped = volts.abs().min(MAX_VOLT);
        let high = (ON_TIME_MS as f32 * (clamped / MAX_VOLT) + 0.5) as u32;
        if volts > 0.0 {
            prop_assert_eq!((forward, backward), (high, 0));
        } else if volts < 0.0 {
            prop_assert_eq!((forward, backward), (0, high));
        } else {
            prop_assert_eq!((forward, backward), (0, 0));
        }
    }

    #[test]
    fn fill_in_leaves_no_gaps(
        samples in prop::collection::vec((0usize..PROFILE_LEN, 0u8..=100), 1..40),
    ) {
        let mut drawn = DrawnProfile::new();
        for &(column, power) in &samples {
            drawn.set(column, power);
        }
        let before: Vec<Option<u8>> = drawn.columns().to_vec();

        prop_assert!(drawn.fill_in_drawn_distribution());
        prop_assert!(drawn.is_complete());

        let first = before.iter().flatten().next().copied().unwrap();
        let mut last = first;
        for (column, slot) in before.iter().enumerate() {
            match slot {
                Some(v) => {
                    prop_assert_eq!(drawn.get(column), Some(*v));
                    last = *v;
                }
                None => prop_assert_eq!(drawn.get(column), Some(last)),
            }
        }
    }
}
