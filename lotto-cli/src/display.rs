use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use lotto_engine::{ConfidenceBreakdown, Prediction, Statistics, StrategyKind, StrategyWeights};
use lotto_model::{Candidate, GameConfig, ScoredCandidate};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn confidence_color(confidence: u8) -> Color {
    match confidence {
        70.. => Color::Green,
        40..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

pub fn display_stats(config: &GameConfig, stats: &Statistics) {
    println!(
        "\n📊 {} : {} tirages, fréquence attendue {:.2}\n",
        config.name(),
        stats.draw_count,
        stats.expected_frequency
    );

    println!("── Chauds / froids / retards ──");
    let mut table = new_table(vec!["Rang", "Chaud", "Fréq.", "Froid", "Fréq.", "Retard", "Tirages"]);
    let rows = stats.hot.len().max(stats.cold.len()).max(stats.overdue.len());
    for i in 0..rows {
        let hot = stats.hot.get(i);
        let cold = stats.cold.get(i);
        let overdue = stats.overdue.get(i);
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(hot.map_or(String::new(), |(n, _)| format!("{:2}", n))).fg(Color::Green),
            Cell::new(hot.map_or(String::new(), |(_, c)| c.to_string())),
            Cell::new(cold.map_or(String::new(), |(n, _)| format!("{:2}", n))).fg(Color::Red),
            Cell::new(cold.map_or(String::new(), |(_, c)| c.to_string())),
            Cell::new(overdue.map_or(String::new(), |(n, _)| format!("{:2}", n))),
            Cell::new(overdue.map_or(String::new(), |(_, g)| g.to_string())),
        ]);
    }
    println!("{table}");

    if !stats.common_pairs.is_empty() {
        println!("\n── Paires fréquentes ──");
        let mut table = new_table(vec!["Paire", "Tirages"]);
        for ((a, b), count) in &stats.common_pairs {
            table.add_row(vec![format!("{:2} - {:2}", a, b), count.to_string()]);
        }
        println!("{table}");
    }

    println!("\n── Impairs par tirage ──");
    let mut table = new_table(vec!["Impairs", "Tirages"]);
    for (odd, count) in &stats.odd_even.counts {
        table.add_row(vec![odd.to_string(), count.to_string()]);
    }
    println!("{table}");

    println!("\n── Dizaines ──");
    let mut table = new_table(vec!["Plage", "Numéros tirés"]);
    for bin in &stats.decades {
        table.add_row(vec![format!("{}-{}", bin.start, bin.end), bin.count.to_string()]);
    }
    println!("{table}");

    let sums = &stats.sums;
    println!(
        "\nSommes : min {} / max {} / moyenne {:.1}",
        sums.min, sums.max, sums.mean
    );
    println!("Écarts les plus fréquents : {:?}", stats.deltas.top(5));

    let p = &stats.patterns;
    println!("\n── Profils ──");
    let mut table = new_table(vec!["Profil", "Tirages"]);
    for (label, count) in [
        ("Tout impair", p.all_odd),
        ("Tout pair", p.all_even),
        ("Équilibré", p.balanced),
        ("Plutôt bas", p.mostly_low),
        ("Plutôt haut", p.mostly_high),
        ("Consécutifs", p.consecutive),
        ("Large écart", p.wide_spread),
    ] {
        table.add_row(vec![label.to_string(), count.to_string()]);
    }
    println!("{table}");
}

pub fn display_prediction(kind: StrategyKind, prediction: &Prediction, confidence: &ConfidenceBreakdown) {
    println!("\n🎯 Stratégie {kind}\n");
    println!("  Grille    : {}", prediction.candidate);
    println!("  Confiance : {}/100", confidence.total());
    if let Some(fallback) = prediction.fallback {
        println!("  Repli     : {:?}", fallback);
    }
}

pub fn display_sets(sets: &[ScoredCandidate], seed: u64) {
    if sets.is_empty() {
        println!("Aucune grille générée.");
        return;
    }

    println!("\n🎰 Grilles suggérées (seed={seed})\n");
    let mut table = new_table(vec!["#", "Numéros", "Confiance", "Stratégie"]);
    for (i, set) in sets.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(set.candidate.to_string()),
            Cell::new(format!("{}/100", set.confidence)).fg(confidence_color(set.confidence)),
            Cell::new(&set.strategy),
        ]);
    }
    println!("{table}");
}

pub fn display_confidence(candidate: &Candidate, breakdown: &ConfidenceBreakdown) {
    println!("\nGrille : {candidate}\n");
    let mut table = new_table(vec!["Composante", "Points (/20)"]);
    for (label, value) in [
        ("Fréquence", breakdown.frequency),
        ("Pair / impair", breakdown.balance),
        ("Écart", breakdown.spread),
        ("Dizaines", breakdown.decades),
        ("Paires", breakdown.pairs),
    ] {
        table.add_row(vec![label.to_string(), format!("{:.1}", value)]);
    }
    let total = breakdown.total();
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(format!("{total}/100")).fg(confidence_color(total)),
    ]);
    println!("{table}");
}

pub fn display_weights(weights: &StrategyWeights) {
    let mut table = new_table(vec!["Stratégie", "Poids", "Réglable"]);
    for (kind, weight) in weights.entries() {
        let adjustable = StrategyWeights::ADJUSTABLE.contains(&kind.name());
        table.add_row(vec![
            kind.to_string(),
            format!("{:.2}", weight),
            if adjustable { "oui" } else { "non" }.to_string(),
        ]);
    }
    println!("{table}");
}
