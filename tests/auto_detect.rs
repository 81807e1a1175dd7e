//! Three stego copies of the same cover, one per carrier, each correctly
//! recovered by `decode_any`.

use image::{ImageBuffer, Rgb};
use std::path::Path;
use stego_codec::{dct, dwt, lsb, Carrier};

fn write_gradient(path: &Path, size: u32) {
    let img = ImageBuffer::<Rgb<u8>, _>::from_fn(size, size, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save(path).unwrap();
}

#[test]
fn auto_detect_recovers_each_of_three_carrier_variants() {
    let dir = std::env::temp_dir().join("stego_codec_it_auto_detect_three");
    std::fs::create_dir_all(&dir).unwrap();
    let cover = dir.join("cover.png");
    write_gradient(&cover, 256);

    let lsb_out = dir.join("lsb.png");
    let dct_out = dir.join("dct.png");
    let dwt_out = dir.join("dwt.png");

    lsb::encode(&cover, b"m1", &lsb_out).unwrap();
    dct::encode(&cover, b"m2", &dct_out).unwrap();
    dwt::encode(&cover, b"m3", &dwt_out).unwrap();

    let (carrier, msg) = stego_codec::decode_any(&lsb_out).unwrap();
    assert_eq!(carrier, Carrier::Lsb);
    assert_eq!(msg, b"m1");

    let (carrier, msg) = stego_codec::decode_any(&dct_out).unwrap();
    assert_eq!(carrier, Carrier::Dct);
    assert_eq!(msg, b"m2");

    let (carrier, msg) = stego_codec::decode_any(&dwt_out).unwrap();
    assert_eq!(carrier, Carrier::Dwt);
    assert_eq!(msg, b"m3");
}
