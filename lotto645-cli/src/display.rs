use std::collections::BTreeMap;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use textplots::{Chart, Plot, Shape};

use crate::import::ImportResult;
use lotto645_db::models::Draw;
use lotto645_engine::catalog::AlgorithmInfo;
use lotto645_engine::constraints::BallColor;
use lotto645_engine::context::DatasetInfo;
use lotto645_engine::report::{Analysis, FrequencyChart, WindowOutcome};
use lotto645_engine::StrategyCode;

fn ball_cell(n: u8) -> Cell {
    let (r, g, b) = BallColor::of(n).rgb();
    Cell::new(format!("{:2}", n)).fg(Color::Rgb { r, g, b })
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Numéros"]);

    for draw in draws {
        table.add_row(vec![
            draw.round.to_string(),
            draw.date.clone(),
            join_numbers(&draw.sorted_numbers()),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_info(info: &DatasetInfo) {
    println!("\n📊 Dernier tirage : {}  ({} tirages en base)\n", info.latest_round, info.total_records);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "N1", "N2", "N3", "N4", "N5", "N6"]);

    for recent in &info.recent_numbers {
        let mut row = vec![Cell::new(recent.round), Cell::new(&recent.date)];
        row.extend(recent.numbers.iter().map(|&n| ball_cell(n)));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_outcome(outcome: &WindowOutcome) {
    match outcome {
        WindowOutcome::Ready(analysis) => display_analysis(analysis),
        WindowOutcome::NoData { error } => {
            println!("{error}. Lancez d'abord : lotto645 import");
        }
    }
}

pub fn display_analysis(analysis: &Analysis) {
    println!(
        "\n🎯 Tirage {}, fenêtre {} ({} tirages utilisés)",
        analysis.latest_round, analysis.window, analysis.draws_used
    );
    println!(
        "   🔥 Chauds : {}   ❄️ Froids : {}\n",
        analysis.hot_pool_size, analysis.cold_pool_size
    );

    if analysis.predictions.is_empty() {
        println!("Pool chaud insuffisant (< 6 numéros) : aucune grille pour cette fenêtre.");
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                "Code", "Algorithme", "N1", "N2", "N3", "N4", "N5", "N6",
                "Somme", "Imp:Pair", "Bas:Haut", "AC", "Unités", "Froids", "Statut",
            ]);

        for p in &analysis.predictions {
            let mut row = vec![Cell::new(p.code), Cell::new(p.name)];
            row.extend(p.numbers.numbers().iter().map(|&n| ball_cell(n)));

            let status_color = if p.acceptance.is_degraded() { Color::Yellow } else { Color::Green };
            row.extend([
                Cell::new(p.report.sum),
                Cell::new(&p.odd_even),
                Cell::new(&p.high_low),
                Cell::new(p.report.ac_value),
                Cell::new(p.report.last_digit_sum),
                Cell::new(p.report.cold_count),
                Cell::new(p.acceptance.to_string()).fg(status_color),
            ]);
            table.add_row(row);
        }
        println!("{table}");
    }

    println!("\n── Pool chaud ──\n{}", join_numbers(&analysis.hot_pool));
    println!("\n── Pool froid ──\n{}", join_numbers(&analysis.cold_pool));

    display_frequency_chart(&analysis.frequency_data);
}

pub fn display_frequency_chart(chart: &FrequencyChart) {
    if chart.numbers.is_empty() {
        return;
    }
    println!("\n── Fréquences du pool chaud ──\n");

    let points: Vec<(f32, f32)> = chart
        .numbers
        .iter()
        .zip(chart.counts.iter())
        .map(|(&n, &c)| (n as f32, c as f32))
        .collect();
    let y_max = chart.counts.iter().copied().max().unwrap_or(1) as f32;

    let shape = Shape::Bars(&points);
    let mut plot = Chart::new_with_y_range(120, 40, 0.0, 46.0, 0.0, y_max + 1.0);
    println!("{}", plot.lineplot(&shape));
}

pub fn display_multi(results: &BTreeMap<u32, WindowOutcome>) {
    for (window, outcome) in results {
        println!("\n════════ Fenêtre demandée : {} ════════", window);
        display_outcome(outcome);
    }
}

pub fn display_algorithms(entries: &[(StrategyCode, AlgorithmInfo)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["", "Code", "Algorithme", "Description", "Point fort"]);

    for (code, info) in entries {
        table.add_row(vec![
            info.icon.to_string(),
            code.to_string(),
            info.name.to_string(),
            info.description.to_string(),
            info.strength.to_string(),
        ]);
    }
    println!("{table}");
}
