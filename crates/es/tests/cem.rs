use es::{Cem, CemConfig};

fn config(pop_size: usize) -> CemConfig {
    CemConfig { pop_size, sigma_init: 0.1, seed: 42, ..CemConfig::default() }
}

#[test]
fn ask_returns_exactly_pop_size_individuals() {
    let mut cem = Cem::new(vec![0.0; 6], &config(8));
    let pop = cem.ask(8);
    assert_eq!(pop.len(), 8);
    assert!(pop.iter().all(|ind| ind.len() == 6));
}

#[test]
fn odd_population_disables_antithetic_sampling() {
    let even = Cem::new(vec![0.0; 4], &config(8));
    let odd = Cem::new(vec![0.0; 4], &config(7));
    assert!(even.antithetic());
    assert!(!odd.antithetic());
}

#[test]
fn antithetic_samples_are_mirrored_around_the_mean() {
    let mu = vec![1.0, -2.0, 0.5];
    let mut cem = Cem::new(mu.clone(), &config(6));
    let pop = cem.ask(6);
    for pair in pop.chunks(2) {
        for i in 0..mu.len() {
            let mid = (pair[0][i] + pair[1][i]) / 2.0;
            assert!((mid - mu[i]).abs() < 1e-5, "pair not mirrored at coord {i}");
        }
    }
}

#[test]
fn elitism_reinjects_the_best_individual_by_value() {
    let mut cfg = config(4);
    cfg.elitism = true;
    let mut cem = Cem::new(vec![0.0; 3], &cfg);

    let pop = cem.ask(4);
    // Make individual 2 the clear winner.
    let fitnesses = vec![0.0, 1.0, 10.0, -1.0];
    let best = pop[2].clone();
    cem.tell(&pop, &fitnesses);

    let next = cem.ask(4);
    assert!(
        next.iter().any(|ind| ind == &best),
        "previous best must reappear in the next population"
    );
    assert_eq!(cem.best().unwrap().1, 10.0);
}

#[test]
fn tell_mean_stays_within_parent_bounds() {
    let mut cfg = config(4);
    cfg.parents = Some(2);
    cfg.damping_init = 0.0;
    cfg.damping_final = 0.0;
    let mut cem = Cem::new(vec![0.0; 4], &cfg);

    let pop = cem.ask(4);
    let fitnesses = vec![3.0, 7.0, 1.0, 5.0];
    // Parents are the two best: individuals 1 and 3.
    let parents = [&pop[1], &pop[3]];
    cem.tell(&pop, &fitnesses);

    for i in 0..4 {
        let lo = parents[0][i].min(parents[1][i]);
        let hi = parents[0][i].max(parents[1][i]);
        let m = cem.mean()[i];
        assert!(m >= lo - 1e-6 && m <= hi + 1e-6, "mean coord {i} outside convex span");
    }
}

#[test]
fn damping_never_increases_and_respects_the_floor() {
    let mut cfg = config(4);
    cfg.damping_init = 1e-2;
    cfg.damping_final = 1e-4;
    let mut cem = Cem::new(vec![0.0; 3], &cfg);

    let mut prev = cem.damping();
    for _ in 0..200 {
        let pop = cem.ask(4);
        let fitnesses: Vec<f32> = (0..4).map(|i| i as f32).collect();
        cem.tell(&pop, &fitnesses);
        let d = cem.damping();
        assert!(d <= prev + f32::EPSILON, "damping increased: {prev} -> {d}");
        assert!(d >= 1e-4);
        prev = d;
    }
    assert!((prev - 1e-4).abs() < 1e-5, "damping should approach the floor, got {prev}");
}

#[test]
#[should_panic(expected = "length mismatch")]
fn tell_rejects_misaligned_fitness_lists() {
    let mut cem = Cem::new(vec![0.0; 2], &config(4));
    let pop = cem.ask(4);
    cem.tell(&pop, &[1.0, 2.0]);
}
