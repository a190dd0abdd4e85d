use calio_core::time::{local_date, to_local};
use calio_core::usecase::dashboard::Dashboard;
use calio_core::{BodyProfile, DailyStats, DayGroup, FoodEntry, InsightLevel, UserSettings};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Meal")]
    meal: String,
    #[tabled(rename = "Food")]
    name: String,
    #[tabled(rename = "kcal")]
    calories: u32,
    #[tabled(rename = "P/C/F (g)")]
    macros: String,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "kcal")]
    calories: String,
    #[tabled(rename = "Protein")]
    protein: String,
    #[tabled(rename = "Water")]
    water: String,
    #[tabled(rename = "On target")]
    on_target: String,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Food")]
    name: String,
    #[tabled(rename = "Meal")]
    meal: String,
    #[tabled(rename = "kcal")]
    calories: u32,
}

#[derive(Tabled)]
struct KeyValueRow {
    #[tabled(rename = "Setting")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn macros(entry: &FoodEntry) -> String {
    format!("{:.0}/{:.0}/{:.0}", entry.protein, entry.carbs, entry.fat)
}

pub fn print_food_added(entry: &FoodEntry) {
    println!(
        "Logged: {} ({} kcal, {}) on {} (ID: {})",
        entry.name,
        entry.calories,
        entry.meal_type.as_str(),
        to_local(entry.timestamp).format("%Y-%m-%d %H:%M"),
        entry.id
    );
}

pub fn print_day(stats: &DailyStats, settings: &UserSettings) {
    println!(
        "\n\x1b[1;36m{}\x1b[0m",
        local_date(stats.date).format("%A %Y-%m-%d")
    );

    if stats.entries.is_empty() {
        println!("No food logged.");
    } else {
        let mut entries = stats.entries.clone();
        entries.sort_by_key(|e| e.timestamp);
        let rows = entries
            .iter()
            .map(|e| EntryRow {
                time: to_local(e.timestamp).format("%H:%M").to_string(),
                id: short_id(&e.id),
                meal: e.meal_type.as_str().to_string(),
                name: e.name.clone(),
                calories: e.calories,
                macros: macros(e),
            })
            .collect();
        println!("{}", render::<EntryRow>(rows));
    }

    let remaining = stats.remaining_calories();
    let verdict = if stats.total_calories == 0 {
        "nothing logged"
    } else if stats.is_on_target() {
        "on target"
    } else {
        "over target"
    };
    println!(
        "Calories: {} / {} kcal ({}, {} {})",
        stats.total_calories,
        stats.target,
        verdict,
        remaining.abs(),
        if remaining >= 0 { "left" } else { "over" }
    );
    println!(
        "Protein {:.1}/{:.0}g  Carbs {:.1}/{:.0}g  Fat {:.1}/{:.0}g",
        stats.total_protein,
        settings.daily_protein_target,
        stats.total_carbs,
        settings.daily_carbs_target,
        stats.total_fat,
        settings.daily_fat_target
    );
    println!(
        "Water: {} / {} ml ({} drinks)",
        stats.total_water,
        settings.daily_water_target,
        stats.water_entries.len()
    );

    let by_meal = stats.calories_by_meal();
    if !by_meal.is_empty() {
        let parts: Vec<String> = by_meal
            .iter()
            .map(|(meal, kcal)| format!("{} {}", meal.as_str(), kcal))
            .collect();
        println!("By meal: {}", parts.join(", "));
    }
}

pub fn print_week(week: &[DailyStats]) {
    let rows = week
        .iter()
        .map(|day| DayRow {
            date: local_date(day.date).format("%a %m-%d").to_string(),
            calories: format!("{} / {}", day.total_calories, day.target),
            protein: format!("{:.1}g", day.total_protein),
            water: format!("{}ml", day.total_water),
            on_target: if day.is_on_target() { "yes" } else { "-" }.to_string(),
        })
        .collect();
    println!("{}", render::<DayRow>(rows));
}

pub fn print_progress(dashboard: &Dashboard) {
    let progress = &dashboard.progress;
    let averages = &dashboard.averages;

    println!("\n\x1b[1;36mProgress\x1b[0m");
    println!("Current streak: {} days", progress.current_streak);
    println!("Longest streak: {} days", progress.longest_streak);
    println!(
        "On target this week: {} / {} days",
        progress.days_on_target, progress.total_days
    );
    println!("Weekly average: {} kcal", progress.weekly_average);
    println!(
        "Averages: protein {:.1}g, carbs {:.1}g, fat {:.1}g, water {}ml",
        averages.protein, averages.carbs, averages.fat, averages.water
    );

    if !dashboard.insights.is_empty() {
        println!("\n\x1b[1;36mInsights\x1b[0m");
        for insight in &dashboard.insights {
            println!("{} {}", level_tag(insight.level), insight.message);
        }
    }
}

fn level_tag(level: InsightLevel) -> &'static str {
    match level {
        InsightLevel::Success => "\x1b[32m[ok]\x1b[0m",
        InsightLevel::Warning => "\x1b[33m[warn]\x1b[0m",
        InsightLevel::Info => "\x1b[34m[info]\x1b[0m",
        InsightLevel::Error => "\x1b[31m[alert]\x1b[0m",
    }
}

pub fn print_profile(profile: &BodyProfile, settings: &UserSettings) {
    println!("\n\x1b[1;36m{}\x1b[0m", settings.user_name);
    println!(
        "{:.1} kg, {:.0} cm, {} years, {:?}, {:?}",
        settings.weight, settings.height, settings.age, settings.gender, settings.activity_level
    );
    println!(
        "BMI:  {:.1} {} {}",
        profile.bmi,
        level_tag(profile.bmi_category.level()),
        profile.bmi_category.label()
    );
    println!("BMR:  {} kcal/day", profile.bmr);
    println!("TDEE: {} kcal/day", profile.tdee);
}

pub fn print_history(groups: &[DayGroup]) {
    if groups.is_empty() {
        println!("No matching entries.");
        return;
    }

    let mut rows = Vec::new();
    for group in groups {
        let day_header = format!(
            "{} ({})\n{} kcal",
            group.date.format("%Y-%m-%d"),
            group.date.format("%a"),
            group.total_calories
        );
        for (i, entry) in group.entries.iter().enumerate() {
            rows.push(HistoryRow {
                // Only the first row of a day carries the date cell.
                date: if i == 0 { day_header.clone() } else { String::new() },
                id: short_id(&entry.id),
                name: entry.name.clone(),
                meal: entry.meal_type.as_str().to_string(),
                calories: entry.calories,
            });
        }
    }
    println!("{}", render::<HistoryRow>(rows));
}

pub fn print_settings(settings: &UserSettings) {
    let rows = vec![
        KeyValueRow { key: "name", value: settings.user_name.clone() },
        KeyValueRow { key: "calories", value: format!("{} kcal", settings.daily_calorie_target) },
        KeyValueRow { key: "protein", value: format!("{:.1} g", settings.daily_protein_target) },
        KeyValueRow { key: "carbs", value: format!("{:.1} g", settings.daily_carbs_target) },
        KeyValueRow { key: "fat", value: format!("{:.1} g", settings.daily_fat_target) },
        KeyValueRow { key: "water", value: format!("{} ml", settings.daily_water_target) },
        KeyValueRow { key: "weight", value: format!("{:.1} kg", settings.weight) },
        KeyValueRow { key: "height", value: format!("{:.1} cm", settings.height) },
        KeyValueRow { key: "age", value: settings.age.to_string() },
        KeyValueRow { key: "gender", value: format!("{:?}", settings.gender) },
        KeyValueRow { key: "activity", value: format!("{:?}", settings.activity_level) },
    ];
    println!("{}", render(rows));
}
