use linkgraph_engine::Engine;
use rand::{rngs::StdRng, Rng, SeedableRng};

// Ingests a synthetic encyclopedic dump of 100,000 articles, preprocesses,
// and ranks it. Each article links to between 0 and 400 others; the first
// 3 articles receive disproportionately many incoming links, mimicking the
// hub pages real dumps tend to have (main topic pages, disambiguation
// targets, country/year articles).
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let n: usize = 100_000;
    let mut engine = Engine::new();
    let mut rng = StdRng::seed_from_u64(5);

    for from in 0..n {
        let out_degree = rng.gen_range(0..400);
        let links: Vec<String> = (0..out_degree)
            .map(|_| {
                let mut to = rng.gen_range(0..n);
                if to > 80_000 {
                    to = rng.gen_range(0..3);
                }
                format!("article-{}", to)
            })
            .collect();
        engine.add_page(&format!("article-{}", from), &links, None);
    }

    engine.preprocess();
    engine.log_stats();

    let (scores, reports) = engine.run(20);
    for (i, report) in reports.iter().enumerate() {
        log::info!(
            "iteration {}: delta={:.6e} broken_incoming={}",
            i,
            report.delta,
            report.broken_incoming
        );
    }

    let mut top: Vec<(&String, &f64)> = scores.iter().collect();
    top.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap());
    for (url, score) in top.into_iter().take(5) {
        println!("{}: {:.6}", url, score);
    }

    Ok(())
}
