#![allow(clippy::float_cmp, clippy::cast_precision_loss)]
//! Tests for `NoiseEngine` cached kernel dispatch.

use super::dispatch::{sample_row, warmup, NoiseEngine};
use super::scalar::gradient_coherent_noise_3d;
use crate::cpu::{detect_tier, supports, InstructionTier};
use crate::error::Error;
use crate::interp::Quality;

fn unsupported_tier() -> Option<InstructionTier> {
    InstructionTier::ALL.into_iter().find(|&tier| !supports(tier))
}

fn row(len: usize) -> Vec<f32> {
    (0..len).map(|i| i as f32 * 0.43 - 7.1).collect()
}

// ---------------------------------------------------------------------------
// Construction & trait bounds
// ---------------------------------------------------------------------------

#[test]
fn test_noise_engine_is_send_sync_copy() {
    fn assert_send_sync_copy<T: Send + Sync + Copy>() {}
    assert_send_sync_copy::<NoiseEngine>();
}

#[test]
fn test_noise_engine_debug_impl() {
    let engine = NoiseEngine::new(InstructionTier::Fallback).expect("fallback");
    let debug = format!("{engine:?}");
    assert!(debug.contains("NoiseEngine"));
    assert!(debug.contains("Fallback"));
}

#[test]
fn test_detected_engine_uses_detected_tier() {
    let engine = NoiseEngine::detected();
    assert_eq!(engine.tier(), detect_tier());
    assert_eq!(engine.lanes(), detect_tier().lanes());
    assert_eq!(NoiseEngine::default().tier(), detect_tier());
}

#[test]
fn test_unsupported_tier_is_rejected() {
    let Some(tier) = unsupported_tier() else {
        return;
    };
    let err = NoiseEngine::new(tier).unwrap_err();
    assert_eq!(err, Error::UnsupportedTier(tier));
    assert!(err.is_config_error());
    assert!(sample_row(&[0.5], 0.5, 0.5, 0, Quality::Best, tier).is_err());
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_neon_rejected_on_x86_64() {
    assert!(matches!(
        NoiseEngine::new(InstructionTier::Neon),
        Err(Error::UnsupportedTier(InstructionTier::Neon))
    ));
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

#[test]
fn test_sample_matches_scalar() {
    let engine = NoiseEngine::detected();
    for quality in Quality::ALL {
        assert_eq!(
            engine.sample(0.3, 1.7, -2.2, 42, quality),
            gradient_coherent_noise_3d(0.3, 1.7, -2.2, 42, quality)
        );
    }
}

#[test]
fn test_sample_row_into_rejects_length_mismatch() {
    let engine = NoiseEngine::detected();
    let xs = row(10);
    let mut out = vec![0.0; 9];
    let err = engine
        .sample_row_into(&xs, &mut out, 0.0, 0.0, 1, Quality::Standard)
        .unwrap_err();
    assert_eq!(
        err,
        Error::LengthMismatch {
            expected: 10,
            actual: 9
        }
    );
}

#[test]
fn test_empty_row() {
    let engine = NoiseEngine::detected();
    assert!(engine.sample_row(&[], 0.0, 0.0, 0, Quality::Best).is_empty());
    let mut out: [f32; 0] = [];
    assert!(engine
        .sample_row_into(&[], &mut out, 0.0, 0.0, 0, Quality::Best)
        .is_ok());
}

#[test]
fn test_sample_row_fills_every_sample_on_each_tier() {
    for tier in InstructionTier::ALL.into_iter().filter(|&t| supports(t)) {
        let engine = NoiseEngine::new(tier).expect("supported tier");
        for len in [0, 1, engine.lanes() - 1, engine.lanes(), 3 * engine.lanes() + 2] {
            let xs = row(len);
            let sampled = engine.sample_row(&xs, 2.7, -0.6, 11, Quality::Best);
            assert_eq!(sampled.len(), len, "{tier} len {len}");
            for (&x, &v) in xs.iter().zip(&sampled) {
                assert_eq!(
                    v.to_bits(),
                    gradient_coherent_noise_3d(x, 2.7, -0.6, 11, Quality::Best).to_bits(),
                    "{tier} len {len} x {x}"
                );
            }
        }
    }
}

#[test]
fn test_sample_row_into_overwrites_output() {
    let engine = NoiseEngine::detected();
    let xs = row(37);
    let mut out = vec![f32::NAN; xs.len()];
    engine
        .sample_row_into(&xs, &mut out, 1.5, -0.25, 8, Quality::Best)
        .expect("sample");
    assert!(out.iter().all(|v| v.is_finite()));
    assert_eq!(out, engine.sample_row(&xs, 1.5, -0.25, 8, Quality::Best));
}

#[test]
fn test_free_sample_row_matches_engine() {
    let xs = row(50);
    let tier = detect_tier();
    let free = sample_row(&xs, 0.7, 3.1, -5, Quality::Standard, tier).expect("supported");
    let engine = NoiseEngine::new(tier).expect("supported");
    assert_eq!(free, engine.sample_row(&xs, 0.7, 3.1, -5, Quality::Standard));
}

#[test]
fn test_sample_row_aligned() {
    let engine = NoiseEngine::detected();
    let xs = row(45);
    for alignment in [16, 32, 64] {
        let buffer = engine
            .sample_row_aligned(&xs, 2.2, -9.9, 77, Quality::Best, alignment)
            .expect("aligned row");
        assert_eq!(buffer.as_ptr() as usize % alignment, 0);
        assert_eq!(
            buffer.as_f32_slice().expect("f32 view"),
            engine.sample_row(&xs, 2.2, -9.9, 77, Quality::Best).as_slice()
        );
    }
}

#[test]
fn test_sample_row_aligned_rejects_bad_alignment() {
    let engine = NoiseEngine::detected();
    assert_eq!(
        engine
            .sample_row_aligned(&row(4), 0.0, 0.0, 0, Quality::Fast, 24)
            .unwrap_err(),
        Error::InvalidAlignment(24)
    );
    assert_eq!(
        engine
            .sample_row_aligned(&row(4), 0.0, 0.0, 0, Quality::Fast, 2)
            .unwrap_err(),
        Error::InvalidAlignment(2)
    );
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = NoiseEngine::detected();
    let xs = row(64);
    let expected = engine.sample_row(&xs, 0.9, 0.1, 3, Quality::Best);
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(engine.sample_row(&xs, 0.9, 0.1, 3, Quality::Best), expected);
            });
        }
    });
}

#[test]
fn test_warmup_is_idempotent() {
    warmup();
    warmup();
    assert!(supports(detect_tier()));
}
