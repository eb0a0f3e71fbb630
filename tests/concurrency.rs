use std::thread;

use nfa_regex::{Automaton, Executor, Regex};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn compiled_patterns_are_send_and_sync() {
    assert_send_sync::<Regex>();
    assert_send_sync::<Automaton<char>>();
    assert_send_sync::<Automaton<u8>>();
}

#[test]
fn one_regex_matched_from_many_threads() {
    let _ = env_logger::builder().is_test(true).try_init();
    let re = Regex::new(r"(?=\w*\d)[a-z0-9]{2,8}|x+").unwrap();
    let inputs = ["abc1", "abcd", "x", "xxxx", "a1", "toolong123", "", "9"];
    let expected: Vec<bool> = inputs.iter().map(|input| re.accept(input)).collect();
    assert_eq!(expected, [true, false, true, true, true, false, false, false]);

    thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    (0..50)
                        .map(|_| inputs.iter().map(|input| re.accept(input)).collect::<Vec<_>>())
                        .all(|got| got == expected)
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
}

#[test]
fn separate_executors_share_one_automaton() {
    let automaton = Regex::new("(ab|c)+d").unwrap().into_automaton();
    let inputs = ["abd", "cd", "abccabd", "d", "abcd "];

    thread::scope(|s| {
        for (i, input) in inputs.iter().enumerate() {
            let automaton = &automaton;
            s.spawn(move || {
                let chars: Vec<char> = input.chars().collect();
                let mut executor = Executor::new(automaton, &chars);
                assert_eq!(executor.run(), i < 3, "{input:?}");
                executor.reset();
                assert_eq!(executor.run(), automaton.accept(&chars), "{input:?}");
            });
        }
    });
}
