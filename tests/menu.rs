//! Tests of the menu state machine, driven by scripted input.


use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use datebook::menu;

use scenarios::MemorySource;

/// Run the main menu over a scripted input, counting the login attempts
async fn run_main_menu(source: &MemorySource, script: &str) -> usize {
    let connect_count = AtomicUsize::new(0);
    let mut input = Cursor::new(script.to_string());

    menu::main_menu(&mut input, false, |_credentials| {
        connect_count.fetch_add(1, Ordering::SeqCst);
        source.clone()
    }).await.unwrap();

    connect_count.load(Ordering::SeqCst)
}

#[tokio::test]
async fn entering_zero_exits_without_logging_in() {
    let _ = env_logger::builder().is_test(true).try_init();
    let source = MemorySource::new();
    let connects = run_main_menu(&source, "0\n").await;
    assert_eq!(connects, 0);
}

#[tokio::test]
async fn unrecognized_choices_redisplay_the_menu() {
    let _ = env_logger::builder().is_test(true).try_init();
    let source = MemorySource::new();
    // Bogus entries are silently ignored until "0" exits
    let connects = run_main_menu(&source, "7\nnope\n\n0\n").await;
    assert_eq!(connects, 0);
}

#[tokio::test]
async fn logging_in_enters_the_calendar_menu_exactly_once() {
    let _ = env_logger::builder().is_test(true).try_init();
    let source = MemorySource::new();
    // 1 = log in, credentials, 0 = log out, 0 = exit
    let connects = run_main_menu(&source, "1\njohn\nsecret\n0\n0\n").await;
    assert_eq!(connects, 1);
}

#[tokio::test]
async fn declining_the_login_retry_shuts_down() {
    let _ = env_logger::builder().is_test(true).try_init();
    let source = MemorySource::refusing_logins();
    let connects = run_main_menu(&source, "1\njohn\nwrong\nn\n").await;
    assert_eq!(connects, 1);
}

#[tokio::test]
async fn accepting_the_login_retry_asks_for_credentials_again() {
    let _ = env_logger::builder().is_test(true).try_init();
    let source = MemorySource::refusing_logins();
    // First attempt fails, "maybe" is re-asked, "y" retries, second failure, "n" gives up
    let connects = run_main_menu(&source, "1\njohn\nwrong\nmaybe\ny\njohn\nwrong\nn\n").await;
    assert_eq!(connects, 2);
}

#[tokio::test]
async fn an_event_can_be_created_through_the_menus() {
    let _ = env_logger::builder().is_test(true).try_init();
    let source = MemorySource::new().with_calendar("Home");

    // log in, goto Home, create an event, back, log out, exit
    let script = "1\njohn\nsecret\n\
        2\nHome\n\
        2\nStandup\n2024.01.01\n09.00.00\n2024.01.01\n09.15.00\n\
        0\n0\n0\n";
    let connects = run_main_menu(&source, script).await;
    assert_eq!(connects, 1);

    let calendar = source.calendar("Home");
    let objects = source.objects_of(&calendar);
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].events().len(), 1);
    assert_eq!(objects[0].events()[0].summary(), "Standup");
}

#[tokio::test]
async fn looking_up_a_missing_calendar_stays_in_the_calendar_menu() {
    let _ = env_logger::builder().is_test(true).try_init();
    let source = MemorySource::new().with_calendar("Home");

    // The failed lookup is reported and the calendar menu keeps running
    let script = "1\njohn\nsecret\n\
        2\nNoSuchCalendar\n\
        1\n\
        0\n0\n";
    let connects = run_main_menu(&source, script).await;
    assert_eq!(connects, 1);
}
