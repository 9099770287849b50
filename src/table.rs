use crate::activity::Activity;
use crate::schedule::CpmOutcome;
use chrono::NaiveDateTime;
use polars::prelude::*;
use polars::prelude::PlSmallStr;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row per activity, in input order, with its CPM timings.
///
/// Activities the computation never saw (filtered out upstream) keep
/// null timing cells.
pub fn schedule_table(activities: &[Activity], outcome: &CpmOutcome) -> PolarsResult<DataFrame> {
    let schedule = &outcome.schedule;
    let stamp = |value: Option<NaiveDateTime>| value.map(|v| v.format(TIMESTAMP_FORMAT).to_string());

    let mut codes = Vec::with_capacity(activities.len());
    let mut names = Vec::with_capacity(activities.len());
    let mut durations = Vec::with_capacity(activities.len());
    let mut early_start = Vec::with_capacity(activities.len());
    let mut early_finish = Vec::with_capacity(activities.len());
    let mut late_start = Vec::with_capacity(activities.len());
    let mut late_finish = Vec::with_capacity(activities.len());
    let mut floats: Vec<Option<f64>> = Vec::with_capacity(activities.len());
    let mut critical = Vec::with_capacity(activities.len());

    for activity in activities {
        let code = activity.task_code.as_str();
        codes.push(activity.task_code.clone());
        names.push(activity.task_name.clone());
        durations.push(activity.duration_hours);
        early_start.push(stamp(schedule.early_start_at(code)));
        early_finish.push(stamp(schedule.early_finish_at(code)));
        late_start.push(stamp(schedule.late_start_at(code)));
        late_finish.push(stamp(schedule.late_finish_at(code)));
        floats.push(schedule.timing(code).map(|t| (t.total_float * 100.0).round() / 100.0));
        critical.push(schedule.is_critical(code));
    }

    let columns = vec![
        Series::new(PlSmallStr::from_static("task_code"), codes).into_column(),
        Series::new(PlSmallStr::from_static("task_name"), names).into_column(),
        Series::new(PlSmallStr::from_static("duration_hours"), durations).into_column(),
        Series::new(PlSmallStr::from_static("early_start"), early_start).into_column(),
        Series::new(PlSmallStr::from_static("early_finish"), early_finish).into_column(),
        Series::new(PlSmallStr::from_static("late_start"), late_start).into_column(),
        Series::new(PlSmallStr::from_static("late_finish"), late_finish).into_column(),
        Series::new(PlSmallStr::from_static("total_float_hours"), floats).into_column(),
        Series::new(PlSmallStr::from_static("is_critical"), critical).into_column(),
    ];
    DataFrame::new(columns)
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Boolean(true) => "yes".to_string(),
        AnyValue::Boolean(false) => String::new(),
        AnyValue::Float64(v) => format!("{v:.2}"),
        other => other.to_string(),
    }
}

/// Renders a frame as a boxed ASCII table.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect();
        rows.push(row);
    }

    let mut widths: Vec<usize> = names.iter().map(|n| n.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let line = |cells: &[String]| {
        let mut out = String::from("|");
        for (cell, width) in cells.iter().zip(&widths) {
            let pad = width.saturating_sub(cell.chars().count());
            out.push(' ');
            out.push_str(cell);
            out.push_str(&" ".repeat(pad));
            out.push_str(" |");
        }
        out
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&line(&names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::Dependency;
    use crate::schedule::CriticalPathCalculator;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn table_has_one_row_per_activity() {
        let activities = vec![
            Activity::new("A", "Excavate").with_planned(at(8), at(12)),
            Activity::new("B", "Pour footing").with_planned(at(12), at(16)),
            Activity::new("C", "Order rebar").with_planned(at(8), at(9)),
        ];
        let deps = vec![Dependency::new("A", "B")];
        let outcome = CriticalPathCalculator::new(&activities, &deps)
            .calculate()
            .unwrap();

        let df = schedule_table(&activities, &outcome).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 9);

        let critical = df.column("is_critical").unwrap().bool().unwrap();
        assert_eq!(critical.get(0), Some(true));
        assert_eq!(critical.get(1), Some(true));
        assert_eq!(critical.get(2), Some(false));

        let es = df.column("early_start").unwrap().str().unwrap();
        assert_eq!(es.get(1), Some("2025-03-03 12:00"));

        let text = render_text_table(&df);
        assert!(text.contains("| task_code"));
        assert!(text.contains("Pour footing"));
    }
}
