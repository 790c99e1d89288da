//! Lane-generic coherent noise row kernel.
//!
//! Every wide tier runs the same sequence of float and integer operations as
//! [`gradient_coherent_noise_3d`](super::scalar::gradient_coherent_noise_3d);
//! only the primitive operations differ. The body is written once here and
//! instantiated per instruction set.

// =============================================================================
// Row Kernel Macro
// =============================================================================

/// Generates `unsafe fn $name(xs: &[f32], out: &mut [f32], row: &RowContext)`.
///
/// The invoking module supplies the vector types and primitives:
///
/// - `F` (float vector), `I` (int vector), `LANES`
/// - `load`, `store`, `splat`, `add`, `sub`, `mul`, `div`
/// - `lower_corner`, `add_one`, `to_float`, `hash_axis`
/// - `splat_i32`, `xor_i32`, `mul_i32` (wrapping 32-bit low multiply)
///
/// The generated kernel fills `out[..xs.len() / LANES * LANES]`; callers
/// finish the remainder with the scalar kernel. The `#[target_feature]`
/// attributes passed before the name are applied to every generated fn.
macro_rules! coherent_row_kernel {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[inline]
        unsafe fn s_curve3_v(a: F) -> F {
            mul(mul(a, a), sub(splat(3.0), mul(splat(2.0), a)))
        }

        $(#[$attr])*
        #[inline]
        unsafe fn s_curve5_v(a: F) -> F {
            let a3 = mul(mul(a, a), a);
            let a4 = mul(a3, a);
            let a5 = mul(a4, a);
            add(
                sub(mul(splat(6.0), a5), mul(splat(15.0), a4)),
                mul(splat(10.0), a3),
            )
        }

        $(#[$attr])*
        #[inline]
        unsafe fn lerp_v(n0: F, n1: F, a: F) -> F {
            add(n0, mul(a, sub(n1, n0)))
        }

        $(#[$attr])*
        #[inline]
        unsafe fn smooth_v(a: F, quality: $crate::interp::Quality) -> F {
            match quality {
                $crate::interp::Quality::Fast => a,
                $crate::interp::Quality::Standard => s_curve3_v(a),
                $crate::interp::Quality::Best => s_curve5_v(a),
            }
        }

        /// x component of the gradient; shared by all eight corners.
        $(#[$attr])*
        #[inline]
        unsafe fn gradient_x_v(x: F, seed: i32) -> F {
            let h: I = hash_axis(x);
            let r = xor_i32(
                splat_i32(seed),
                mul_i32(splat_i32($crate::noise::scalar::X_NOISE_GEN), h),
            );
            let cubed = mul_i32(
                mul_i32(mul_i32(r, r), r),
                splat_i32($crate::noise::scalar::GRADIENT_HASH_MUL),
            );
            div(
                to_float(cubed),
                splat($crate::noise::scalar::GRADIENT_NORM),
            )
        }

        /// `((g_x·x_off + y_term) + z_term) · 2.12`
        $(#[$attr])*
        #[inline]
        unsafe fn corner_v(gx_term: F, y_term: f32, z_term: f32) -> F {
            mul(
                add(add(gx_term, splat(y_term)), splat(z_term)),
                splat($crate::noise::scalar::GRADIENT_SCALE),
            )
        }

        /// Fills `out` with coherent noise for each full chunk of `xs`.
        ///
        /// # Safety
        ///
        /// The host must support this module's instruction set and
        /// `xs.len()` must equal `out.len()`.
        $(#[$attr])*
        pub(crate) unsafe fn $name(
            xs: &[f32],
            out: &mut [f32],
            row: &$crate::noise::scalar::RowContext,
        ) {
            debug_assert_eq!(xs.len(), out.len());
            let chunks = xs.len() / LANES;
            let xs_ptr = xs.as_ptr();
            let out_ptr = out.as_mut_ptr();

            let ys = splat(row.ys);
            let zs = splat(row.zs);
            let [y0_term, y1_term] = row.y_terms;
            let [z0_term, z1_term] = row.z_terms;

            for chunk in 0..chunks {
                let offset = chunk * LANES;
                // SAFETY: offset + LANES <= xs.len() == out.len()
                let x = load(xs_ptr.add(offset));

                let x0 = lower_corner(x);
                let x0f = to_float(x0);
                let x1f = to_float(add_one(x0));
                let xs_curve = smooth_v(sub(x, x0f), row.quality);

                let gx = gradient_x_v(x, row.seed);
                let gx0 = mul(gx, sub(x, x0f));
                let gx1 = mul(gx, sub(x, x1f));

                let ix0 = lerp_v(
                    corner_v(gx0, y0_term, z0_term),
                    corner_v(gx1, y0_term, z0_term),
                    xs_curve,
                );
                let ix1 = lerp_v(
                    corner_v(gx0, y1_term, z0_term),
                    corner_v(gx1, y1_term, z0_term),
                    xs_curve,
                );
                let iy0 = lerp_v(ix0, ix1, ys);

                let ix0 = lerp_v(
                    corner_v(gx0, y0_term, z1_term),
                    corner_v(gx1, y0_term, z1_term),
                    xs_curve,
                );
                let ix1 = lerp_v(
                    corner_v(gx0, y1_term, z1_term),
                    corner_v(gx1, y1_term, z1_term),
                    xs_curve,
                );
                let iy1 = lerp_v(ix0, ix1, ys);

                store(out_ptr.add(offset), lerp_v(iy0, iy1, zs));
            }
        }
    };
}

pub(crate) use coherent_row_kernel;
