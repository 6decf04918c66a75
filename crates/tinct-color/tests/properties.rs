//! Behavioral guarantees that hold across formats and spaces.

use approx::assert_abs_diff_eq;
use tinct_color::{
    ConversionPlan, Rgb, Rgb8, Rgb16, Rgba8, Rgba16, RgbaF32, Route, TypedPlan, Xyz, layout,
};
use tinct_core::{AcesCg, Channel, LinearSrgb, PixelFormat, Rec2020, Srgb, f16};

#[test]
fn same_format_is_lossless() {
    for v in [0u16, 1, 0x7FFF, 0x8000, 0xFFFF] {
        let px = Rgba16::from_rgba(v, v / 3, 0xFFFF - v, v);
        let out: Rgba16 = px.convert().unwrap();
        assert_eq!(out, px);
    }

    let plan = ConversionPlan::parse("rgb:r16g16b16_sfixed4@Rec2020", "rgb:r16g16b16_sfixed4@Rec2020")
        .unwrap();
    assert!(matches!(plan.route(), Route::SameSpace));
    let src = [0x34, 0x12, 0x00, 0x80, 0xFF, 0x7F];
    let mut out = [0u8; 6];
    plan.convert_pixel(&src, &mut out).unwrap();
    assert_eq!(out, src);
}

#[test]
fn same_space_is_per_channel_reencode() {
    for v in [0u8, 1, 0x02, 0x7F, 0x80, 0xC3, 0xFF] {
        let out: Rgb<layout::Rgb, u16> = Rgb8::from_rgb(v, v, v).convert().unwrap();
        let expected = u16::encode(v.decode());
        assert_eq!(out.components(), &[expected; 3]);

        let out: Rgb<layout::Rgb, i16> = Rgb8::from_rgb(v, 0, 0).convert().unwrap();
        assert_eq!(out.components()[0], i16::encode(v.decode()));
    }
}

#[test]
fn chained_conversions_stay_within_one_unit() {
    for v in [0u8, 0x10, 0x40, 0x80, 0xBE, 0xFF] {
        let px = Rgb8::from_rgb(v, 0xFF - v, v / 2);
        let direct: Rgb<layout::Rgb, u16, AcesCg> = px.convert().unwrap();
        let linear: Rgb<layout::Rgb, f64, LinearSrgb> = px.convert().unwrap();
        let chained: Rgb<layout::Rgb, u16, AcesCg> = linear.convert().unwrap();
        for (a, b) in direct.components().iter().zip(chained.components()) {
            assert!(a.abs_diff(*b) <= 1, "{direct:?} vs {chained:?}");
        }
    }
}

#[test]
fn same_space_chains_stay_within_intermediate_precision() {
    // One i8 step is 65535 / 254 u16 units, so half a step rounds to at most 257.
    for v in 0..=255u8 {
        let px = Rgb8::from_rgb(v, 0xFF - v, v / 2);
        let direct: Rgb16 = px.convert().unwrap();

        let snorm: Rgb<layout::Rgb, i8> = px.convert().unwrap();
        let via_snorm: Rgb16 = snorm.convert().unwrap();
        let half: Rgb<layout::Rgb, f16> = px.convert().unwrap();
        let via_half: Rgb16 = half.convert().unwrap();

        for chained in [via_snorm, via_half] {
            for (a, b) in direct.components().iter().zip(chained.components()) {
                assert!(a.abs_diff(*b) <= 257, "{direct:?} vs {chained:?}");
            }
        }
        for (a, b) in direct.components().iter().zip(via_half.components()) {
            assert!(a.abs_diff(*b) <= 16, "{direct:?} vs {via_half:?}");
        }
    }
}

#[test]
fn float_detour_returns_to_8bit() {
    let px = Rgb8::from_rgb(0xFF, 0x80, 0x00);
    let wide: RgbaF32 = px.convert().unwrap();
    let back: Rgb8 = wide.convert().unwrap();
    assert_eq!(back.components(), &[0xFF, 0x80, 0x00]);
}

#[test]
fn alpha_is_never_color_transformed() {
    for a in [0u8, 0x40, 0xFF] {
        let px = Rgba8::from_rgba(0x10, 0x80, 0xF0, a);
        let expected = u16::encode(a.decode());

        let gamma: Rgb<layout::Rgba, u16, LinearSrgb> = px.convert().unwrap();
        assert_eq!(gamma.channel(tinct_core::ComponentKind::A), expected);

        let gamut: Rgb<layout::Rgba, u16, Rec2020> = px.convert().unwrap();
        assert_eq!(gamut.channel(tinct_core::ComponentKind::A), expected);

        let plan = ConversionPlan::parse("rgb:r8g8b8a8", "rgb:r16g16b16a16@ACEScg").unwrap();
        assert!(plan.route().to_string().contains("ACEScg"));
        let mut out = [0u8; 8];
        plan.convert_pixel(&[0x10, 0x80, 0xF0, a], &mut out).unwrap();
        assert_eq!(u16::from_le_bytes([out[6], out[7]]), expected);
    }
}

#[test]
fn engines_agree() {
    let fmt = PixelFormat::parse("rgb:b8g8r8a8").unwrap();
    let to_aces = TypedPlan::<Rgb<layout::Rgba, u16, AcesCg>>::new(&fmt).unwrap();
    let to_grey = TypedPlan::<Rgb<layout::LumaAlpha, u8>>::new(&fmt).unwrap();

    for v in [0u8, 0x21, 0x80, 0xE7, 0xFF] {
        let bytes = [v / 2, 0xFF - v, v, 0x99];
        let px = Rgb::<layout::Bgra, u8, Srgb>::read_le(&bytes);

        let fixed: Rgb<layout::Rgba, u16, AcesCg> = px.convert().unwrap();
        assert_eq!(to_aces.convert_pixel(&bytes).unwrap(), fixed);

        let fixed: Rgb<layout::LumaAlpha, u8> = px.convert().unwrap();
        assert_eq!(to_grey.convert_pixel(&bytes).unwrap(), fixed);
    }
}

#[test]
fn xyz_pivot_matches_plan() {
    let px = Rgb16::from_rgb(0x1234, 0xABCD, 0x8000);
    let xyz: Xyz = px.to_xyz().unwrap();

    let plan = ConversionPlan::parse("rgb:r16g16b16", "xyz:x64y64z64").unwrap();
    let mut bytes = [0u8; 6];
    px.write_le(&mut bytes);
    let mut out = [0u8; 24];
    plan.convert_pixel(&bytes, &mut out).unwrap();
    let dynamic: Vec<f64> = out
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect();
    for (a, b) in dynamic.iter().zip(xyz.to_array()) {
        assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
    }

    let back: Rgb16 = xyz.to_rgb().unwrap();
    for (a, b) in back.components().iter().zip(px.components()) {
        assert!(a.abs_diff(*b) <= 1);
    }
}

#[test]
fn xyz_target_drops_alpha() {
    let xyz: Xyz = RgbaF32::from_rgba(0.2, 0.4, 0.6, 1.0).to_xyz().unwrap();
    let back: RgbaF32 = xyz.to_rgb().unwrap();
    let [r, g, b, a] = back.tristimulus_with_alpha();
    assert_abs_diff_eq!(r, 0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(g, 0.4, epsilon = 1e-6);
    assert_abs_diff_eq!(b, 0.6, epsilon = 1e-6);
    assert_eq!(a, 0.0);
}

#[test]
fn packed_formats_are_unsupported() {
    for (from, to) in [
        ("rgb:r5g6b5", "rgb:r8g8b8"),
        ("rgb:r8g8b8", "rgb:r10g10b10a2"),
        ("rgb:r8g8b8a8", "rgb:r8g16b8"),
    ] {
        let err = ConversionPlan::parse(from, to).unwrap_err();
        assert!(err.is_unsupported(), "{from} -> {to}: {err}");
    }
}
