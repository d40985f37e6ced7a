// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader, BufWriter};

/// 按行读取任意异步输入
pub async fn read_lines_from<R>(reader: R) -> std::io::Result<Vec<String>>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut collected = Vec::new();
    while let Some(line) = lines.next_line().await? {
        collected.push(line);
    }
    Ok(collected)
}

/// 按行读取文件
pub async fn read_lines(path: impl AsRef<Path>) -> std::io::Result<Vec<String>> {
    let file = fs::File::open(path).await?;
    read_lines_from(file).await
}

/// 从标准输入按行读取
pub async fn read_lines_from_stdin() -> std::io::Result<Vec<String>> {
    read_lines_from(tokio::io::stdin()).await
}

/// 覆盖写入文件，每行一个条目
pub async fn write_lines<S>(path: impl AsRef<Path>, lines: &[S]) -> std::io::Result<()>
where
    S: AsRef<str>,
{
    let file = fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_ref().as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    writer.flush().await?;
    Ok(())
}
