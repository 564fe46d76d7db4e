use chrono::{Duration, Utc};
use rand::Rng;
use sugi_api::ANSWER_COUNT;
use uuid::Uuid;

const NUM_ESSAYS: usize = 40;
const NUM_COMMENTS: usize = 120;

fn gen_n_items(table: &str, n: usize, mut f: impl FnMut(usize) -> String) {
    println!("INSERT INTO {} VALUES", table);
    for i in 0..n {
        if i != 0 {
            println!(",");
        }
        print!("    {}", f(i));
    }
    println!();
    println!("ON CONFLICT DO NOTHING;");
}

fn sql_str(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn gen_nickname(rng: &mut impl Rng) -> String {
    match rng.gen_bool(0.5) {
        true => sql_str(&lipsum::lipsum_title().to_lowercase()),
        false => String::from("NULL"),
    }
}

fn gen_answer(rng: &mut impl Rng) -> String {
    match rng.gen_range(0..10) {
        // unanswered
        0..=2 => String::new(),
        // short answer
        3..=7 => lipsum::lipsum_words(rng.gen_range(5..40)),
        // long answer, to exercise the split layouts
        _ => lipsum::lipsum_words(rng.gen_range(100..250)),
    }
}

fn main() {
    let mut rng = rand::thread_rng();

    let mut essays = Vec::new();
    gen_n_items("essays", NUM_ESSAYS, |_| {
        let id = Uuid::new_v4();
        essays.push(id);
        let mut answers: Vec<String> = (0..ANSWER_COUNT).map(|_| gen_answer(&mut rng)).collect();
        if answers.iter().all(|a| a.is_empty()) {
            answers[0] = lipsum::lipsum_words(10);
        }
        let array = format!(
            "ARRAY[{}]",
            answers
                .iter()
                .map(|a| sql_str(a))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let created = Utc::now() - Duration::minutes(rng.gen_range(0..60_000));
        format!(
            "('{}', {}, {}, '{}', {})",
            id,
            gen_nickname(&mut rng),
            array,
            created.to_rfc3339(),
            rng.gen_range(0..50),
        )
    });

    let mut rng = rand::thread_rng();
    gen_n_items("comments", NUM_COMMENTS, |_| {
        let created = Utc::now() - Duration::minutes(rng.gen_range(0..30_000));
        format!(
            "('{}', '{}', {}, {}, '{}')",
            Uuid::new_v4(),
            essays[rng.gen_range(0..essays.len())],
            gen_nickname(&mut rng),
            sql_str(&lipsum::lipsum_words(rng.gen_range(3..30))),
            created.to_rfc3339(),
        )
    });
}
