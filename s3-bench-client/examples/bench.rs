/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time;

use clap::Parser;
use s3_bench_client::module::RootModule;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "bench")]
#[command(about = "Runs upload/download iterations against an S3-compatible endpoint.")]
pub struct Args {
    /// Endpoint URL, e.g. http://127.0.0.1:9000
    #[arg(long, required = true)]
    endpoint: String,

    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    access_key: String,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY")]
    secret_key: String,

    #[arg(long, default_value = "us-east-1")]
    region: String,

    /// Bucket to write to. Must already exist.
    #[arg(long, required = true)]
    bucket: String,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Iterations per worker
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Size of the random payload uploaded in every iteration
    #[arg(long, default_value_t = 1024 * 1024)]
    object_size: i64,

    /// Also upload this file in parts once per worker
    #[arg(long)]
    large_file: Option<PathBuf>,

    #[arg(long, default_value_t = 8 * 1024 * 1024)]
    part_size: i64,

    #[arg(long, default_value_t = 8)]
    concurrency: i64,
}

fn worker(root: &RootModule, args: &Args, id: usize) -> Result<time::Duration, BoxError> {
    let s3 = root.new_module_instance();
    let client = s3.create(&args.access_key, &args.secret_key, &args.endpoint, &args.region)?;

    let start = time::Instant::now();
    for iteration in 0..args.iterations {
        let key = format!("bench/{id}/{iteration}");
        let data = s3.random_data(args.object_size)?;
        s3.upload_data(&client, &args.bucket, &key, data.clone())?;
        if !data.is_empty() {
            let first = s3.download_data_range(&client, &args.bucket, &key, 0, 0)?;
            assert_eq!(data[..1], first[..], "first byte mismatch for {key}");
        }
    }

    if let Some(path) = &args.large_file {
        s3.upload_large_file(
            &client,
            &args.bucket,
            &format!("bench/{id}/large"),
            path,
            args.part_size,
            args.concurrency,
        )?;
    }

    Ok(start.elapsed())
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let root = RootModule::new()?;

    let start = time::Instant::now();
    let results = thread::scope(|scope| {
        let handles = (0..args.workers)
            .map(|id| {
                let root = &root;
                let args = &args;
                scope.spawn(move || worker(root, args, id))
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| BoxError::from("worker panicked"))?)
            .collect::<Vec<_>>()
    });

    let mut failed = 0;
    for (id, result) in results.iter().enumerate() {
        match result {
            Ok(elapsed) => println!("worker {id}: {} iterations in {elapsed:?}", args.iterations),
            Err(err) => {
                failed += 1;
                eprintln!("worker {id} failed: {err}");
            }
        }
    }

    let total_bytes = args.object_size.max(0) as u64 * (args.iterations * args.workers) as u64;
    let elapsed = start.elapsed();
    println!(
        "uploaded {total_bytes} bytes in {elapsed:?} ({:.2} MiB/s), {failed} workers failed",
        total_bytes as f64 / 1_048_576.0 / elapsed.as_secs_f64()
    );
    Ok(())
}
