use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use tessera_image::Image;
use tessera_imgproc::mosaic::{compose_mosaic, MosaicConfig, MosaicLayout};

fn bench_mosaic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mosaic");

    for num_images in [4, 9, 16].iter() {
        let parameter_string = format!("{}", num_images);

        // images of different sizes and a dark square on a white background
        let images = (0..*num_images)
            .map(|i| {
                let (width, height) = (200 + 17 * i, 160 + 23 * i);
                let mut data = vec![255u8; width * height * 3];
                for y in height / 4..3 * height / 4 {
                    for x in width / 4..3 * width / 4 {
                        let idx = (y * width + x) * 3;
                        data[idx..idx + 3].copy_from_slice(&[40, 80, 120]);
                    }
                }
                Image::<u8, 3>::new([width, height].into(), data).unwrap()
            })
            .collect::<Vec<_>>();

        let side = (*num_images as f64).sqrt().ceil() as usize;
        let layout = MosaicLayout::new(side, side);

        for (name, config) in [
            (
                "plain",
                MosaicConfig {
                    auto_crop: false,
                    auto_border: false,
                },
            ),
            ("auto_border", MosaicConfig::default()),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, &parameter_string),
                &images,
                |b, i| b.iter(|| compose_mosaic(black_box(i.as_slice()), layout, &config)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_mosaic);
criterion_main!(benches);
