extern crate env_logger;
extern crate lazytex;
extern crate rand;

use rand::Rng;

use lazytex::prelude::*;

fn testbed(visitor: HeadlessVisitor, settings: ContextSettings) -> (Context, CallLog) {
    let _ = env_logger::try_init();

    let log = visitor.log();
    (Context::headless(visitor, settings), log)
}

fn headless() -> (Context, CallLog) {
    testbed(HeadlessVisitor::new(), ContextSettings::default())
}

fn rgb(value: u8) -> TextureData {
    TextureData::from_vec(&[4, 4, 3], vec![value; 48]).unwrap()
}

#[test]
fn upload_then_fast_update() {
    let (ctx, log) = headless();

    let mut texture = Texture::with_data(Target::Texture2D, rgb(1), UploadParams::default()).unwrap();
    texture.activate(&ctx).unwrap();

    let id = texture.handle().id().unwrap();
    let target = Target::Texture2D;
    assert_eq!(
        log.take(),
        vec![
            Call::CreateTexture(id),
            Call::BindTexture(target, id),
            Call::TexImage {
                target,
                level: 0,
                format: PixelFormat::Rgb,
                size: vec![4, 4],
                pixel_type: PixelType::UnsignedByte,
                data: Some(vec![1; 48]),
            },
            Call::TexParameter(
                target,
                TextureParameter::MinFilter,
                TextureParameterValue::Linear
            ),
            Call::TexParameter(
                target,
                TextureParameter::MagFilter,
                TextureParameterValue::Linear
            ),
            Call::IsTexture(id),
            Call::Enable(target),
            Call::BindTexture(target, id),
        ]
    );

    texture.deactivate(&ctx).unwrap();
    assert_eq!(
        log.take(),
        vec![
            Call::BindTexture(target, 0),
            Call::ActiveTexture(0),
            Call::Disable(target),
        ]
    );

    // Same shape, no offset: written in place.
    texture.set_data(rgb(2), UploadParams::default()).unwrap();
    texture.activate(&ctx).unwrap();
    texture.deactivate(&ctx).unwrap();

    let calls = log.take();
    assert_eq!(calls.iter().filter(|v| v.is_tex_image()).count(), 0);
    assert!(!calls.contains(&Call::CreateTexture(id + 1)));

    let updates: Vec<_> = calls.iter().filter(|v| v.is_tex_sub_image()).collect();
    assert_eq!(updates.len(), 1);
    match *updates[0] {
        Call::TexSubImage {
            ref offset,
            ref size,
            format,
            ref data,
            ..
        } => {
            assert_eq!(offset, &vec![0, 0]);
            assert_eq!(size, &vec![4, 4]);
            assert_eq!(format, PixelFormat::Rgb);
            assert_eq!(data, &vec![2; 48]);
        }
        _ => unreachable!(),
    }

    assert_eq!(texture.handle().id(), Some(id));
}

#[test]
fn other_shape_reallocates() {
    let (ctx, log) = headless();

    let mut texture = Texture::with_data(Target::Texture2D, rgb(1), UploadParams::default()).unwrap();
    texture.set_parameter("wrap_s", "clamp_to_edge").unwrap();
    texture.activate(&ctx).unwrap();
    texture.deactivate(&ctx).unwrap();
    let first = texture.handle().id().unwrap();
    log.clear();

    let data = TextureData::from_vec(&[8, 8], vec![0u8; 64]).unwrap();
    texture.set_data(data, UploadParams::default()).unwrap();
    texture.activate(&ctx).unwrap();
    texture.deactivate(&ctx).unwrap();

    let second = texture.handle().id().unwrap();
    assert_ne!(first, second);
    assert_eq!(ctx.live_textures(), 1);

    let calls = log.take();
    assert_eq!(calls[0], Call::DeleteTexture(first));
    assert_eq!(calls[1], Call::CreateTexture(second));

    // Every parameter ever set is replayed after a reallocation.
    let params: Vec<_> = calls
        .iter()
        .filter_map(|v| match *v {
            Call::TexParameter(_, param, value) => Some((param, value)),
            _ => None,
        })
        .collect();

    assert_eq!(
        params,
        vec![
            (TextureParameter::MinFilter, TextureParameterValue::Linear),
            (TextureParameter::MagFilter, TextureParameterValue::Linear),
            (TextureParameter::WrapS, TextureParameterValue::ClampToEdge),
        ]
    );
}

#[test]
fn explicit_offset() {
    let (ctx, log) = headless();

    let mut texture = Texture::with_storage(Target::Texture2D, &[16, 16], None).unwrap();
    texture.activate(&ctx).unwrap();
    texture.deactivate(&ctx).unwrap();
    log.clear();

    let block = TextureData::from_vec(&[2, 3], vec![9u8; 6]).unwrap();
    let params = UploadParams {
        offset: Some(vec![4, 8]),
        ..UploadParams::default()
    };

    texture.set_data(block, params).unwrap();
    assert_eq!(texture.shape(), Some(&[16, 16][..]));

    texture.activate(&ctx).unwrap();
    let calls = log.take();

    // Rows of 3 bytes need byte alignment.
    let alignments: Vec<_> = calls
        .iter()
        .filter_map(|v| match *v {
            Call::UnpackAlignment(v) => Some(v),
            _ => None,
        })
        .collect();
    assert_eq!(alignments, vec![1, 4]);

    match calls.iter().find(|v| v.is_tex_sub_image()) {
        Some(&Call::TexSubImage {
            ref offset,
            ref size,
            ..
        }) => {
            assert_eq!(offset, &vec![8, 4]);
            assert_eq!(size, &vec![3, 2]);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn update_without_texture() {
    let (ctx, log) = headless();

    let mut texture = Texture::new_2d();
    let params = UploadParams {
        offset: Some(vec![0, 0]),
        ..UploadParams::default()
    };

    texture.set_data(rgb(0), params).unwrap();
    match texture.activate(&ctx) {
        Err(Error::NoTexture) => {}
        other => panic!("unexpected result {:?}", other),
    }

    assert!(log.is_empty());
    assert!(!texture.is_errored());
}

#[test]
fn unknown_channel_count_is_rejected_early() {
    let (ctx, log) = headless();

    let mut texture = Texture::with_data(Target::Texture2D, rgb(1), UploadParams::default()).unwrap();
    texture.activate(&ctx).unwrap();
    texture.deactivate(&ctx).unwrap();
    log.clear();

    let five = TextureData::from_vec(&[4, 4, 5], vec![0u8; 80]).unwrap();
    match texture.set_data(five, UploadParams::default()) {
        Err(ref err) if err.is_configuration() => {}
        other => panic!("unexpected result {:?}", other),
    }

    assert_eq!(texture.shape(), Some(&[4, 4, 3][..]));
    assert!(!texture.has_pending());

    // The resident image is untouched, so the same shape is still updated in
    // place.
    texture.set_data(rgb(2), UploadParams::default()).unwrap();
    texture.activate(&ctx).unwrap();

    let calls = log.take();
    assert_eq!(calls.iter().filter(|v| v.is_tex_image()).count(), 0);
    assert_eq!(calls.iter().filter(|v| v.is_tex_sub_image()).count(), 1);
}

#[test]
fn textures_outliving_their_context() {
    let (first, _) = headless();

    let mut kept = Texture::with_data(Target::Texture2D, rgb(1), UploadParams::default()).unwrap();
    let mut idle = Texture::with_data(Target::Texture2D, rgb(1), UploadParams::default()).unwrap();
    let mut deleted = Texture::with_data(Target::Texture2D, rgb(1), UploadParams::default()).unwrap();
    kept.activate(&first).unwrap();
    idle.activate(&first).unwrap();
    deleted.activate(&first).unwrap();
    drop(first);

    let (ctx, log) = headless();

    // Nothing of the first context is touched through the second one.
    kept.deactivate(&ctx).unwrap();
    deleted.delete(&ctx);
    idle.activate(&ctx).unwrap();
    assert!(log.is_empty());
    assert_eq!(ctx.enable_count(Target::Texture2D), 0);
    assert_eq!(deleted.handle(), GpuHandle::Uninitialized);
    assert_eq!(idle.handle(), GpuHandle::Uninitialized);
    assert!(idle.shape().is_none());

    // Same shape as before, but there is no image left to update.
    kept.set_data(rgb(2), UploadParams::default()).unwrap();
    kept.activate(&ctx).unwrap();

    let calls = log.take();
    assert_eq!(calls.iter().filter(|v| v.is_tex_image()).count(), 1);
    assert_eq!(calls.iter().filter(|v| v.is_tex_sub_image()).count(), 0);
    assert!(kept.handle().is_live());
    assert_eq!(kept.shape(), Some(&[4, 4, 3][..]));
    assert_eq!(ctx.live_textures(), 1);
    assert_eq!(ctx.enable_count(Target::Texture2D), 1);
}

#[test]
fn storage_for_render_targets() {
    let (ctx, log) = headless();

    let mut texture = Texture::with_storage(Target::Texture2D, &[256, 256], None).unwrap();
    texture.activate(&ctx).unwrap();

    let calls = log.take();
    let images: Vec<_> = calls.iter().filter(|v| v.is_tex_image()).collect();
    assert_eq!(images.len(), 1);
    assert_eq!(
        *images[0],
        Call::TexImage {
            target: Target::Texture2D,
            level: 0,
            format: PixelFormat::Luminance,
            size: vec![256, 256],
            pixel_type: PixelType::UnsignedByte,
            data: None,
        }
    );

    assert!(!calls.iter().any(|v| v.is_tex_sub_image()));
    texture.deactivate(&ctx).unwrap();

    // Same storage once more, nothing to do.
    texture.set_storage(&[256, 256], 0, None).unwrap();
    assert!(!texture.has_pending());
    texture.set_storage(&[256, 256, 1], 0, None).unwrap();
    assert!(!texture.has_pending());

    texture.set_storage(&[256, 256], 0, Some(PixelFormat::Alpha)).unwrap();
    assert!(texture.has_pending());
}

#[test]
fn undescribed_textures_are_not_bound() {
    let (ctx, log) = headless();

    let mut texture = Texture::new_2d();
    texture.unit(2).activate(&ctx).unwrap();
    texture.deactivate(&ctx).unwrap();

    assert!(log.is_empty());
    assert_eq!(ctx.enable_count(Target::Texture2D), 0);
}

#[test]
fn shared_enable() {
    let (ctx, log) = headless();

    let mut textures: Vec<_> = (0..5)
        .map(|i| Texture::with_data(Target::Texture2D, rgb(i), UploadParams::default()).unwrap())
        .collect();

    for (i, texture) in textures.iter_mut().enumerate() {
        texture.unit(i as u32).activate(&ctx).unwrap();
    }

    assert_eq!(ctx.enable_count(Target::Texture2D), 5);

    for texture in &mut textures {
        texture.deactivate(&ctx).unwrap();
        texture.deactivate(&ctx).unwrap();
    }

    assert_eq!(ctx.enable_count(Target::Texture2D), 0);
    assert_eq!(log.count(|v| *v == Call::Enable(Target::Texture2D)), 1);
    assert_eq!(log.count(|v| *v == Call::Disable(Target::Texture2D)), 1);
}

#[test]
fn guard_deactivates() {
    let (ctx, log) = headless();

    let mut texture = Texture::with_data(Target::Texture2D, rgb(0), UploadParams::default()).unwrap();
    {
        let guard = texture.unit(3).bind(&ctx).unwrap();
        assert!(guard.raw().is_bound());
        assert_eq!(ctx.enable_count(Target::Texture2D), 1);
    }

    assert_eq!(ctx.enable_count(Target::Texture2D), 0);
    assert!(!texture.raw().is_bound());

    let calls = log.take();
    let n = calls.len();
    assert_eq!(
        &calls[n - 4..],
        &[
            Call::ActiveTexture(3),
            Call::BindTexture(Target::Texture2D, 0),
            Call::ActiveTexture(0),
            Call::Disable(Target::Texture2D),
        ]
    );

    // The unit only applies to a single activation.
    texture.activate(&ctx).unwrap();
    assert!(!log.calls().contains(&Call::ActiveTexture(3)));
}

#[test]
fn late_parameters_are_flushed() {
    let (ctx, log) = headless();

    let mut texture = Texture::with_data(Target::Texture2D, rgb(0), UploadParams::default()).unwrap();
    texture.activate(&ctx).unwrap();
    texture.deactivate(&ctx).unwrap();
    log.clear();

    texture.set_parameter("wrap_t", "mirrored_repeat").unwrap();
    texture.activate(&ctx).unwrap();

    let id = texture.handle().id().unwrap();
    assert_eq!(
        log.take(),
        vec![
            Call::Enable(Target::Texture2D),
            Call::BindTexture(Target::Texture2D, id),
            Call::TexParameter(
                Target::Texture2D,
                TextureParameter::WrapT,
                TextureParameterValue::MirroredRepeat
            ),
        ]
    );

    assert_eq!(
        texture
            .query_parameter(&ctx, TextureParameter::WrapT)
            .unwrap(),
        TextureParameterValue::MirroredRepeat
    );
}

#[test]
fn u8_upload_is_byte_identical() {
    let (ctx, log) = headless();

    let mut rng = rand::thread_rng();
    let pixels: Vec<u8> = (0..5 * 7 * 4).map(|_| rng.gen()).collect();

    let data = TextureData::from_vec(&[5, 7, 4], pixels.clone()).unwrap();
    let mut texture = Texture::with_data(Target::Texture2D, data, UploadParams::default()).unwrap();
    texture.activate(&ctx).unwrap();

    let calls = log.take();
    match calls.iter().find(|v| v.is_tex_image()) {
        Some(&Call::TexImage {
            format,
            ref size,
            ref data,
            ..
        }) => {
            assert_eq!(format, PixelFormat::Rgba);
            assert_eq!(size, &vec![7, 5]);
            assert_eq!(data.as_ref(), Some(&pixels));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn floats_without_support() {
    let settings = ContextSettings {
        disable_float: true,
        log_conversions: true,
        ..ContextSettings::default()
    };

    let (ctx, log) = testbed(HeadlessVisitor::new(), settings);

    let data = TextureData::from_vec(&[2, 2], vec![0.0f32, 0.25, 0.5, 1.0]).unwrap();
    let mut texture = Texture::with_data(Target::Texture2D, data, UploadParams::default()).unwrap();
    texture.activate(&ctx).unwrap();

    let calls = log.take();
    match calls.iter().find(|v| v.is_tex_image()) {
        Some(&Call::TexImage {
            pixel_type,
            ref data,
            ..
        }) => {
            assert_eq!(pixel_type, PixelType::UnsignedByte);
            assert_eq!(data.as_ref(), Some(&vec![0, 64, 128, 255]));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn missing_capability_is_sticky() {
    let visitor = HeadlessVisitor::new().without(Capability::Texture3D);
    let (ctx, log) = testbed(visitor, ContextSettings::default());

    let data = TextureData::from_vec(&[2, 2, 2], vec![0u8; 8]).unwrap();
    let mut texture = Texture::with_data(Target::Texture3D, data, UploadParams::default()).unwrap();

    for _ in 0..3 {
        texture.activate(&ctx).unwrap();
        texture.deactivate(&ctx).unwrap();
        assert!(texture.is_errored());
    }

    assert!(log.is_empty());

    // New content clears the error.
    texture.set_storage(&[2, 2, 2], 0, None).unwrap();
    assert!(!texture.is_errored());
    assert!(texture.has_pending());
}

#[test]
fn disabled_capability_is_sticky() {
    let settings = ContextSettings {
        disable_texture_3d: true,
        ..ContextSettings::default()
    };

    let (ctx, log) = testbed(HeadlessVisitor::new(), settings);

    let mut texture = Texture::with_storage(Target::Texture3D, &[4, 4, 4], None).unwrap();
    texture.activate(&ctx).unwrap();
    assert!(texture.is_errored());
    assert!(log.is_empty());
}

#[test]
fn driver_failure_is_sticky() {
    let visitor = HeadlessVisitor::new().refuse_creation();
    let (ctx, log) = testbed(visitor, ContextSettings::default());

    let mut texture = Texture::with_data(Target::Texture2D, rgb(0), UploadParams::default()).unwrap();
    texture.activate(&ctx).unwrap();
    assert!(texture.is_errored());
    assert_eq!(log.take(), vec![Call::CreateTexture(0)]);

    texture.activate(&ctx).unwrap();
    texture.activate(&ctx).unwrap();
    assert!(log.is_empty());

    // The shape is forgotten, so this is a full upload again.
    texture.set_data(rgb(0), UploadParams::default()).unwrap();
    texture.activate(&ctx).unwrap();
    assert_eq!(log.take(), vec![Call::CreateTexture(0)]);
}

#[test]
fn delete_and_teardown() {
    let visitor = HeadlessVisitor::new().lost_on_delete();
    let (ctx, log) = testbed(visitor, ContextSettings::default());

    let mut a = Texture::with_data(Target::Texture2D, rgb(0), UploadParams::default()).unwrap();
    let mut b = Texture::with_data(Target::Texture2D, rgb(0), UploadParams::default()).unwrap();
    a.activate(&ctx).unwrap();
    b.activate(&ctx).unwrap();
    assert_eq!(ctx.live_textures(), 2);

    a.delete(&ctx);
    a.delete(&ctx);
    assert_eq!(a.handle(), GpuHandle::Uninitialized);
    assert_eq!(ctx.live_textures(), 1);
    assert_eq!(ctx.enable_count(Target::Texture2D), 1);
    log.clear();

    drop(ctx);
    let id = b.handle().id().unwrap();
    assert_eq!(log.take(), vec![Call::DeleteTexture(id)]);
}

#[test]
fn rejects_cube_maps() {
    match Texture::new(Target::CubeMap) {
        Err(ref err) if err.is_configuration() => {}
        other => panic!("unexpected result {:?}", other),
    }
}
