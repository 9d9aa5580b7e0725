use rayon::prelude::*;

/// Maps `items` through `func`, keeping input order.
///
/// `jobs` of `None` or `Some(1)` runs inline, `Some(0)` uses the global rayon pool
/// and any other count gets a dedicated pool of that size.
pub fn run_in_parallel<T, R, F>(items: Vec<T>, jobs: Option<usize>, func: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    match jobs {
        Some(0) => items.into_par_iter().map(func).collect(),
        Some(count) if count > 1 => {
            match rayon::ThreadPoolBuilder::new().num_threads(count).build() {
                Ok(pool) => pool.install(|| items.into_par_iter().map(&func).collect()),
                Err(_) => items.into_iter().map(func).collect(),
            }
        }
        _ => items.into_iter().map(func).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::run_in_parallel;

    #[test]
    fn keeps_input_order_for_every_job_setting() {
        let expected: Vec<u64> = (0..64u64).map(|n| n * n).collect();
        for jobs in [None, Some(0), Some(1), Some(4)] {
            let out = run_in_parallel((0..64u64).collect(), jobs, |n| n * n);
            assert_eq!(out, expected, "jobs = {jobs:?}");
        }
    }
}
