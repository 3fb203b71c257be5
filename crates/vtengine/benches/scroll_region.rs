use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use vtengine::Screen;
use vtparse::{ByteParser, Sequencer};

/// A margin-scoped scroll region under continuous output, the workload a
/// full-screen editor (e.g. a pager or `vim`) drives on every keystroke.
fn make_scroll_workload(lines: usize) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"\x1b[3;22r"); // DECSTBM: scroll region rows 3-22
    for i in 0..lines {
        data.extend_from_slice(format!("line {i} of scrolling content here\r\n").as_bytes());
    }
    data
}

fn bench_scroll_region(c: &mut Criterion) {
    let workload = make_scroll_workload(5000);
    let mut group = c.benchmark_group("scroll_region");
    group.throughput(Throughput::Bytes(workload.len() as u64));
    group.bench_function("margin_scoped_scroll", |b| {
        b.iter(|| {
            let screen = Screen::new(80, 24, 1000);
            let mut seq = Sequencer::new(screen);
            let mut parser = ByteParser::new();
            parser.parse(black_box(&workload), &mut seq);
            black_box(seq.into_inner());
        });
    });
    group.finish();
}

criterion_group!(scroll_region, bench_scroll_region);
criterion_main!(scroll_region);
