use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use pinfall::api::SimulatedGame;
use pinfall::notation;
use pinfall::scorer::ScoreCard;
use pinfall::store::SavedState;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Scoresheet: marks and running totals per frame.
pub fn print_card(name: &str, card: &ScoreCard) {
    let mut table = new_table();

    let mut header = vec![Cell::new(name).add_attribute(Attribute::Bold)];
    header.extend((1..=10).map(|f| Cell::new(f).add_attribute(Attribute::Bold)));
    table.add_row(header);

    let mut marks = vec![Cell::new("Marks")];
    marks.extend(
        card.frames()
            .iter()
            .map(|f| Cell::new(notation::frame_marks(f))),
    );
    table.add_row(marks);

    let mut totals = vec![Cell::new("Total").fg(Color::Cyan)];
    totals.extend(card.cumulative_scores().iter().map(|s| {
        Cell::new(s.map(|v| v.to_string()).unwrap_or_default()).fg(Color::Cyan)
    }));
    table.add_row(totals);

    for i in 1..=10 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("\n{}", table);
}

pub fn print_summary(games: &[SimulatedGame]) {
    if games.is_empty() {
        return;
    }
    let scores: Vec<u32> = games.iter().map(|g| g.card.final_score()).collect();
    let mean = scores.iter().sum::<u32>() as f64 / scores.len() as f64;
    let min = scores.iter().min().copied().unwrap_or(0);
    let max = scores.iter().max().copied().unwrap_or(0);

    let count = |f: fn(&ScoreCard) -> usize| games.iter().map(|g| f(&g.card)).sum::<usize>();

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Games").add_attribute(Attribute::Bold),
        Cell::new("Mean").fg(Color::Cyan),
        Cell::new("Min"),
        Cell::new("Max"),
        Cell::new("Strikes").fg(Color::Green),
        Cell::new("Spares").fg(Color::Green),
        Cell::new("Splits").fg(Color::Red),
        Cell::new("Fouls").fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new(games.len()),
        Cell::new(format!("{:.2}", mean)).fg(Color::Cyan),
        Cell::new(min),
        Cell::new(max),
        Cell::new(count(ScoreCard::strike_count)),
        Cell::new(count(ScoreCard::spare_count)),
        Cell::new(count(ScoreCard::split_count)),
        Cell::new(count(ScoreCard::foul_count)),
    ]);
    println!("\n{}", table);
}

pub fn print_averages(state: &SavedState) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Bowler").add_attribute(Attribute::Bold),
        Cell::new("Games"),
        Cell::new("Average").fg(Color::Cyan),
    ]);
    for bowler in &state.bowlers {
        let played = state
            .games
            .iter()
            .filter(|g| g.bowler_ids.contains(&bowler.id))
            .count();
        table.add_row(vec![
            Cell::new(&bowler.name).add_attribute(Attribute::Bold),
            Cell::new(played),
            Cell::new(format!("{:.2}", state.bowler_average(&bowler.id))).fg(Color::Cyan),
        ]);
    }
    println!("\n{}", table);
}
