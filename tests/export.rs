mod common;

use common::{at, setup_bot};
use finance_tracker::bot::{messages, Notification};
use regex::Regex;

fn document(bot: &common::TestBot) -> (String, String) {
    let sent = bot.drain();
    match &sent[..] {
        [(_, Notification::Document { file_name, content })] => (
            file_name.clone(),
            String::from_utf8(content.clone()).expect("utf-8 csv"),
        ),
        other => panic!("expected one document, got {other:?}"),
    }
}

#[test]
fn export_sends_the_month_as_csv() {
    let bot = setup_bot(at(2025, 1, 31, 23, 50));
    bot.add_expense(42, "food", "12.5", Some("pizza, large"));
    bot.clock.set(at(2025, 1, 31, 23, 55));
    bot.send(42, "/income").unwrap();
    bot.send(42, "3000").unwrap();
    bot.send(42, "salary").unwrap();
    bot.clock.set(at(2025, 2, 1, 0, 5));
    bot.add_expense(42, "transport", "40", None);
    bot.drain();

    bot.send(42, "/export 2025-01").unwrap();
    let (file_name, csv) = document(&bot);
    assert_eq!(file_name, "finance_42_2025_01.csv");

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "id,type,category,amount,comment,created_at");
    assert_eq!(lines.len(), 3, "February rows stay out");
    assert_eq!(lines[1], "2,income,salary,3000.00,,2025-01-31 23:55");
    assert_eq!(lines[2], r#"1,expense,food,12.50,"pizza, large",2025-01-31 23:50"#);

    let row = Regex::new(r"^\d+,(income|expense),[^,]*,\d+\.\d{2},.*,\d{4}-\d{2}-\d{2} \d{2}:\d{2}$")
        .unwrap();
    assert!(lines[1..].iter().all(|line| row.is_match(line)));
}

#[test]
fn export_only_includes_the_requesting_user() {
    let bot = setup_bot(at(2025, 1, 10, 12, 0));
    bot.add_expense(1, "food", "10", None);
    bot.add_expense(2, "food", "20", None);
    bot.drain();

    bot.send(2, "/export 2025-01").unwrap();
    let (_, csv) = document(&bot);
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains(",20.00,"));
}

#[test]
fn export_rejects_bad_periods_and_reports_empty_months() {
    let bot = setup_bot(at(2025, 1, 10, 12, 0));

    bot.send(1, "/export").unwrap();
    bot.send(1, "/export 2025-13").unwrap();
    bot.send(1, "/export январь").unwrap();
    bot.send(1, "/export 2024-12").unwrap();

    assert_eq!(
        bot.drain_texts(),
        vec![
            messages::EXPORT_USAGE.to_string(),
            messages::EXPORT_BAD_PERIOD.to_string(),
            messages::EXPORT_BAD_PERIOD.to_string(),
            messages::EXPORT_EMPTY.to_string(),
        ]
    );
}
