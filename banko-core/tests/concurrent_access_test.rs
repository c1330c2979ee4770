//! Concurrent access tests
//!
//! Several threads share one BankContext and move money at the same time.
//! Every movement runs under the repository's connection lock inside one
//! database transaction, so balances must match the ledger afterwards.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use rust_decimal::Decimal;
use tempfile::TempDir;

use banko_core::config::{Config, PasswordHashing};
use banko_core::{Actor, AdminRole, BankContext, Error, TransactionKind};

/// Number of concurrent threads
const THREAD_COUNT: usize = 6;

/// Number of iterations per thread
const ITERATIONS_PER_THREAD: usize = 10;

fn create_test_bank(temp_dir: &TempDir) -> Arc<BankContext> {
    let mut config = Config::default();
    config.password_hashing = PasswordHashing {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    };
    Arc::new(BankContext::with_config(temp_dir.path(), config).unwrap())
}

fn teller() -> Actor {
    Actor::Admin {
        username: "Admin".to_string(),
        role: AdminRole::Superadmin,
    }
}

/// Threads depositing into one account: no update is lost
#[test]
fn test_concurrent_deposits_are_not_lost() {
    let temp_dir = TempDir::new().unwrap();
    let bank = create_test_bank(&temp_dir);
    let account_no = bank
        .account_service
        .create_account("Shared", "pw", Decimal::ZERO)
        .unwrap()
        .account_no;

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let mut handles = vec![];

    for _ in 0..THREAD_COUNT {
        let bank = Arc::clone(&bank);
        let barrier = Arc::clone(&barrier);
        let account_no = account_no.clone();

        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..ITERATIONS_PER_THREAD {
                bank.ledger_service
                    .deposit(&teller(), &account_no, Decimal::ONE)
                    .unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let expected = Decimal::from((THREAD_COUNT * ITERATIONS_PER_THREAD) as i64);
    let account = bank
        .account_service
        .get_account(&teller(), &account_no)
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, expected);

    let rows = bank
        .ledger_service
        .history(&teller(), Some(&account_no), Some(1000))
        .unwrap();
    assert_eq!(rows.len(), THREAD_COUNT * ITERATIONS_PER_THREAD);
}

/// Threads racing to drain one account: it never goes negative, and every
/// refused withdrawal leaves no ledger row behind
#[test]
fn test_concurrent_withdrawals_never_overdraw() {
    let temp_dir = TempDir::new().unwrap();
    let bank = create_test_bank(&temp_dir);
    let opening = Decimal::from_str("25.00").unwrap();
    let account_no = bank
        .account_service
        .create_account("Contested", "pw", opening)
        .unwrap()
        .account_no;

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let success_count = Arc::new(AtomicUsize::new(0));
    let refused_count = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];

    for _ in 0..THREAD_COUNT {
        let bank = Arc::clone(&bank);
        let barrier = Arc::clone(&barrier);
        let account_no = account_no.clone();
        let success_count = Arc::clone(&success_count);
        let refused_count = Arc::clone(&refused_count);

        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..ITERATIONS_PER_THREAD {
                match bank.ledger_service.withdraw(&teller(), &account_no, Decimal::ONE) {
                    Ok(_) => {
                        success_count.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => {
                        assert!(matches!(
                            e.downcast_ref::<Error>(),
                            Some(Error::InsufficientFunds { .. })
                        ));
                        refused_count.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let successes = success_count.load(Ordering::SeqCst);
    assert_eq!(successes, 25);
    assert_eq!(
        refused_count.load(Ordering::SeqCst),
        THREAD_COUNT * ITERATIONS_PER_THREAD - 25
    );

    let account = bank
        .account_service
        .get_account(&teller(), &account_no)
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, Decimal::ZERO);

    let withdrawals = bank
        .ledger_service
        .history(&teller(), Some(&account_no), Some(1000))
        .unwrap()
        .into_iter()
        .filter(|tx| tx.kind == TransactionKind::Withdraw)
        .count();
    assert_eq!(withdrawals, successes);
}
