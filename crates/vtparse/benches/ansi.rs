use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use vtparse::{ByteParser, DispatchStatus, Function, ParseError, Params, Sequencer, VtSink};

struct NullSink;

impl VtSink for NullSink {
    fn dispatch(&mut self, _function: Function, _params: &Params, _text: &str) -> DispatchStatus {
        DispatchStatus::Ok
    }

    fn print(&mut self, _ch: char) {}

    fn report_error(&mut self, _error: ParseError) {}
}

fn make_synthetic_inputs() -> (Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut text_heavy = Vec::new();
    for i in 0..1000 {
        text_heavy.extend_from_slice(b"\x1b[32mLine ");
        text_heavy.extend_from_slice(i.to_string().as_bytes());
        text_heavy.extend_from_slice(b": Some text content here\x1b[0m\n");
    }

    let mut csi_heavy = Vec::new();
    for y in 0..100 {
        for x in 0..80 {
            csi_heavy.extend_from_slice(format!("\x1b[{y};{x}H*").as_bytes());
        }
    }

    let mut color_heavy = Vec::new();
    for _ in 0..1000 {
        color_heavy.extend_from_slice(b"\x1b[31mRed\x1b[0m \x1b[32mGreen\x1b[0m \x1b[34mBlue\x1b[0m ");
        color_heavy.extend_from_slice(b"\x1b[1;33mBold Yellow\x1b[0m ");
        color_heavy.extend_from_slice(b"\x1b[38;5;208mOrange\x1b[0m\n");
    }

    let mut mixed = Vec::new();
    for i in 0..500 {
        mixed.extend_from_slice(b"\x1b]0;Window Title\x07");
        mixed.extend_from_slice(format!("\x1b[{};1H", i % 24 + 1).as_bytes());
        mixed.extend_from_slice(b"\x1b[2KClearing line and writing text\n");
        mixed.extend_from_slice(b"Normal text with \x08backspace\t and tab\r\n");
        mixed.extend_from_slice(b"\x1b[1;32mColored text\x1b[0m");
    }

    (text_heavy, csi_heavy, color_heavy, mixed)
}

fn bench_byte_parser(c: &mut Criterion) {
    let (text_heavy, csi_heavy, color_heavy, mixed) = make_synthetic_inputs();
    let mut group = c.benchmark_group("byte_parser");

    for (name, data) in [("text_heavy", &text_heavy), ("csi_heavy", &csi_heavy), ("color_heavy", &color_heavy), ("mixed", &mixed)] {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_function(format!("parse_{name}"), |b| {
            let mut parser = ByteParser::new();
            let mut sink = Sequencer::new(NullSink);
            b.iter(|| {
                parser.parse(black_box(data), &mut sink);
            });
        });
    }

    group.finish();
}

criterion_group!(name = ansi; config = Criterion::default().with_plots(); targets = bench_byte_parser);
criterion_main!(ansi);
