use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dcdl_extractors::gallery::post::{embedded_videos, images, movie_pages};

fn seed_page(num: usize) -> String {
    let mut page = String::from(
        r#"<html><head><meta property="og:title" content="bench"></head><body><div class="write_div">"#,
    );

    for i in 0..num {
        // Every third image repeats an earlier one, every fifth is lazy-loaded.
        let id = if i % 3 == 0 { i / 3 } else { i };
        if i % 5 == 0 {
            page.push_str(&format!(
                r#"<img class="lazy" data-src="https://dcimg8.dcinside.co.kr/viewimage.php?id=2&no={id}">"#
            ));
        } else {
            page.push_str(&format!(
                r#"<p><img src="https://dcimg8.dcinside.co.kr/viewimage.php?id=2&no={id}" alt="img"></p>"#
            ));
        }
        if i % 25 == 0 {
            page.push_str(&format!(
                r#"<iframe src="https://gall.dcinside.com/board/movie/movie_view?no={i}"></iframe><embed src="https://www.youtube.com/embed/v{i}?rel=0">"#
            ));
        }
    }

    page.push_str("</div></body></html>");
    page
}

fn media_scan_bench(c: &mut Criterion) {
    for size in [20, 100, 1000] {
        let page = seed_page(size);
        c.bench_function(&format!("Scan {size} media tags"), |b| {
            b.iter(|| {
                let page = black_box(page.as_str());
                black_box((images(page), movie_pages(page), embedded_videos(page)))
            })
        });
    }
}

criterion_group!(benches, media_scan_bench);
criterion_main!(benches);
