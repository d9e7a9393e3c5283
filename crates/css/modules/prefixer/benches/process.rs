use criterion::{Criterion, criterion_group, criterion_main};
use css_prefixer::{Engine, GridMode, Options};
use std::hint::black_box;

const STYLESHEET: &str = r#"
.layout {
  display: grid;
  grid-template-areas: "head head" "nav main";
  grid-template-columns: 200px 1fr;
  grid-gap: 10px;
}
.nav { grid-area: nav; }
.main { grid-area: main; display: flex; justify-content: space-between; }
.button {
  transition: transform 0.2s, opacity 0.2s;
  user-select: none;
  background: linear-gradient(to bottom, #fff, #eee);
}
@keyframes pulse { from { transform: scale(1); } to { transform: scale(1.1); } }
@supports (display: flex) { .row { flex-flow: row wrap; } }
input::placeholder { color: gray; }
"#;

fn bench_process(criterion: &mut Criterion) {
    let Ok(mut engine) = Engine::new() else {
        return;
    };
    let old = Options {
        grid: GridMode::Autoplace,
        ..Options::for_browsers(["last 2 versions", "ie 10", "chrome 20", "safari 5"])
    };
    let modern = Options::for_browsers(["chrome 131", "firefox 133"]);

    criterion.bench_function("process_old_browsers", |bencher| {
        bencher.iter(|| black_box(engine.process_css(black_box(STYLESHEET), &old).map(|done| done.css.len())));
    });
    criterion.bench_function("process_modern_browsers", |bencher| {
        bencher.iter(|| black_box(engine.process_css(black_box(STYLESHEET), &modern).map(|done| done.css.len())));
    });
}

criterion_group!(prefixer_benches, bench_process);
criterion_main!(prefixer_benches);
