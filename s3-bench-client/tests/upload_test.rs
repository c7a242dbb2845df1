/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use s3_bench_client::error::ErrorKind;
use s3_bench_client::io::InputStream;
use test_common::{create_test_file, rand_data, setup_tracing, FakeS3};

async fn test_client(store: &FakeS3) -> s3_bench_client::Client {
    let config = s3_bench_client::from_env()
        .access_key("minio")
        .secret_key("minio123")
        .endpoint("http://127.0.0.1:9000")
        .region("us-east-1")
        .http_client(store.http_client())
        .load()
        .await
        .unwrap();
    s3_bench_client::Client::new(config)
}

#[tokio::test]
async fn test_upload_file_is_path_style_and_unsigned() {
    setup_tracing();
    let store = FakeS3::new();
    let client = test_client(&store).await;
    let data = rand_data(1024);
    let file = create_test_file(&data);

    client
        .upload()
        .bucket("bench")
        .key("small.bin")
        .body(InputStream::from_path(file.path()).unwrap())
        .send()
        .await
        .unwrap();

    let requests = store.requests();
    assert_eq!(1, requests.len());
    let put = &requests[0];
    assert_eq!("PUT", put.method);
    assert_eq!(Some("127.0.0.1:9000"), put.uri.authority().map(|a| a.as_str()));
    assert_eq!("/bench/small.bin", put.uri.path());
    assert_eq!(Some("UNSIGNED-PAYLOAD"), put.header("x-amz-content-sha256"));
    assert_eq!(Some("1024"), put.header("content-length"));
    assert_eq!(Some(data), store.object("bench", "small.bin"));
}

#[tokio::test]
async fn test_upload_file_then_download_range() {
    let store = FakeS3::new();
    let client = test_client(&store).await;
    let data = rand_data(3000);
    let file = create_test_file(&data);

    client
        .upload()
        .bucket("bench")
        .key("file.bin")
        .body(InputStream::from_path(file.path()).unwrap())
        .send()
        .await
        .unwrap();

    let downloaded = client
        .download_range()
        .bucket("bench")
        .key("file.bin")
        .range(1000..=1999)
        .send()
        .await
        .unwrap();
    assert_eq!(data.slice(1000..2000), downloaded);
}

#[tokio::test]
async fn test_upload_data_round_trip() {
    let store = FakeS3::new();
    let client = test_client(&store).await;
    let data = rand_data(4096);

    client
        .upload()
        .bucket("bench")
        .key("payload")
        .body(data.clone().into())
        .send()
        .await
        .unwrap();

    let downloaded = client
        .download_range()
        .bucket("bench")
        .key("payload")
        .range(0..=(data.len() as u64 - 1))
        .send()
        .await
        .unwrap();

    assert_eq!(data, downloaded);
}

#[tokio::test]
async fn test_upload_overwrites_existing_object() {
    let store = FakeS3::new();
    let client = test_client(&store).await;
    let first = rand_data(100);
    let second = rand_data(50);

    for data in [&first, &second] {
        client
            .upload()
            .bucket("bench")
            .key("overwritten")
            .body(data.clone().into())
            .send()
            .await
            .unwrap();
    }

    assert_eq!(Some(second), store.object("bench", "overwritten"));
}

#[tokio::test]
async fn test_upload_empty_body() {
    let store = FakeS3::new();
    let client = test_client(&store).await;

    client
        .upload()
        .bucket("bench")
        .key("empty")
        .send()
        .await
        .unwrap();

    assert_eq!(Some(Default::default()), store.object("bench", "empty"));
    assert_eq!(Some("0"), store.requests()[0].header("content-length"));
}

#[tokio::test]
async fn test_missing_file_is_rejected_before_sending() {
    let store = FakeS3::new();
    let _client = test_client(&store).await;

    let err = InputStream::from_path("/no/such/dir/payload.bin").unwrap_err();

    assert_eq!(&ErrorKind::IOError, err.kind());
    assert!(store.requests().is_empty());
    assert_eq!(None, store.object("bench", "payload.bin"));
}
