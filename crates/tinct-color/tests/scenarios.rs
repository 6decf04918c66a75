//! End-to-end conversions with known results, through both engines.

use tinct_color::{ConversionPlan, Luma8, Rgb, Rgb8, Rgba8, RgbaF32, TypedPlan, layout};
use tinct_core::{LinearSrgb, PixelFormat};

fn plan(from: &str, to: &str) -> ConversionPlan {
    ConversionPlan::parse(from, to).unwrap()
}

fn run(from: &str, to: &str, src: &[u8]) -> Vec<u8> {
    let plan = plan(from, to);
    let mut out = vec![0u8; plan.target_stride()];
    plan.convert_pixel(src, &mut out).unwrap();
    out
}

fn f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn u16s(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect()
}

#[test]
fn srgb_to_linear_16bit() {
    let px = Rgba8::from_rgba(0xFF, 0x80, 0x02, 0x40);
    let out: Rgb<layout::Rgba, u16, LinearSrgb> = px.convert().unwrap();
    assert_eq!(out.components(), &[0xFFFF, 0x3742, 0x0028, 0x4040]);

    let bytes = run("rgb:r8g8b8a8", "rgb:r16g16b16a16@sRGB^1", &[0xFF, 0x80, 0x02, 0x40]);
    assert_eq!(u16s(&bytes), [0xFFFF, 0x3742, 0x0028, 0x4040]);
}

#[test]
fn snorm_to_unorm() {
    let px = Rgb::<layout::Rgb, i8>::from_rgb(0x20, 0x30, -10);
    let out: Rgb8 = px.convert().unwrap();
    assert_eq!(out.components(), &[0x40, 0x60, 0x00]);

    let bytes = run("rgb:r8g8b8_snorm", "rgb:r8g8b8", &[0x20, 0x30, (-10i8) as u8]);
    assert_eq!(bytes, [0x40, 0x60, 0x00]);
}

#[test]
fn float_to_8bit_drops_alpha() {
    let px = RgbaF32::from_rgba(1.0, 0.5, 0.0, 1.0);
    let out: Rgb8 = px.convert().unwrap();
    assert_eq!(out.components(), &[0xFF, 0x80, 0x00]);

    let mut src = Vec::new();
    for v in [1.0f32, 0.5, 0.0, 1.0] {
        src.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(run("rgb:r32g32b32a32_float", "rgb:r8g8b8", &src), [0xFF, 0x80, 0x00]);
}

#[test]
fn missing_alpha_is_zero() {
    let px = Rgb8::from_rgb(0xFF, 0x00, 0x80);
    let out: RgbaF32 = px.convert().unwrap();
    assert_eq!(out.components(), &[1.0, 0.0, 128.0 / 255.0, 0.0]);

    let bytes = run("rgb:r8g8b8", "rgb:r32g32b32a32_float", &[0xFF, 0x00, 0x80]);
    assert_eq!(f32s(&bytes), [1.0, 0.0, 128.0 / 255.0, 0.0]);
}

#[test]
fn orange_widens_to_float_with_zero_alpha() {
    let expected = [1.0, 128.0 / 255.0, 0.0, 0.0];

    let out: RgbaF32 = Rgb8::from_rgb(0xFF, 0x80, 0x00).convert().unwrap();
    assert_eq!(out.components(), &expected);

    let bytes = run("rgb:r8g8b8", "rgb:r32g32b32a32_float", &[0xFF, 0x80, 0x00]);
    assert_eq!(f32s(&bytes), expected);

    let fmt = PixelFormat::parse("rgb:r8g8b8").unwrap();
    let typed = TypedPlan::<RgbaF32>::new(&fmt).unwrap();
    assert_eq!(typed.convert_pixel(&[0xFF, 0x80, 0x00]).unwrap().components(), &expected);
}

#[test]
fn padded_snorm_to_float() {
    let px = Rgb::<layout::Rgbx, i8>::from_components(&[127, -127, -128, 55]);
    let out: RgbaF32 = px.convert().unwrap();
    assert_eq!(out.components(), &[1.0, -1.0, -1.0, 0.0]);

    let src = [127u8, (-127i8) as u8, (-128i8) as u8, 55];
    let bytes = run("rgb:r8g8b8x8_snorm", "rgb:r32g32b32a32_float", &src);
    assert_eq!(f32s(&bytes), [1.0, -1.0, -1.0, 0.0]);
}

#[test]
fn greyscale_from_color() {
    let out: Luma8 = Rgb8::from_rgb(0xFF, 0x20, 0x40).convert().unwrap();
    assert_eq!(out.components(), &[82]);

    assert_eq!(run("rgb:r8g8b8", "rgb:l8", &[0xFF, 0x20, 0x40]), [82]);
}

#[test]
fn typed_plan_agrees_with_scenarios() {
    let fmt = PixelFormat::parse("rgb:r8g8b8_snorm").unwrap();
    let typed = TypedPlan::<Rgb8>::new(&fmt).unwrap();
    let px = typed.convert_pixel(&[0x20, 0x30, (-10i8) as u8]).unwrap();
    assert_eq!(px.components(), &[0x40, 0x60, 0x00]);

    let fmt = PixelFormat::parse("rgb:r8g8b8").unwrap();
    let typed = TypedPlan::<Luma8>::new(&fmt).unwrap();
    assert_eq!(typed.convert_pixel(&[0xFF, 0x20, 0x40]).unwrap().components(), &[82]);
}
