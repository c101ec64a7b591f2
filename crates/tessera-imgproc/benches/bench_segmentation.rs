use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use tessera_image::{Image, ImageSize};
use tessera_imgproc::segmentation::{segment, SegmentationMode};

// a gray disk on a white background
fn disk_image(size: ImageSize) -> Image<u8, 3> {
    let (cx, cy) = (size.width as f32 / 2.0, size.height as f32 / 2.0);
    let radius = size.width.min(size.height) as f32 / 3.0;
    let mut data = Vec::with_capacity(size.area() * 3);
    for y in 0..size.height {
        for x in 0..size.width {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            let v = if d < radius { 90 } else { 255 };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    Image::new(size, data).unwrap()
}

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Segmentation");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);
        let image = disk_image([*width, *height].into());

        for mode in [SegmentationMode::Fill, SegmentationMode::Value] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", mode), &parameter_string),
                &image,
                |b, i| b.iter(|| segment(black_box(i), black_box(10.0), (0, 0), mode)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_segmentation);
criterion_main!(benches);
