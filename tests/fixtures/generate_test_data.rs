// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成旧系统运单导出 CSV 测试数据集
// 输出: <输出目录>/*.csv（默认 tests/fixtures/datasets）
// 用法: generate_test_data [输出目录]
// ==========================================

use chrono::{Duration, Local};
use csv::Writer;
use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

// 旧系统导出表头
const CSV_HEADER: &[&str] = &[
    "Shipment ID",
    "Shipment Title",
    "Shipper Name",
    "Shipper Phone",
    "Shipper Address",
    "Shipper Email",
    "Receiver Name",
    "Receiver Phone",
    "Receiver Address",
    "Receiver Email",
    "Origin",
    "Destination",
    "Pickup Date",
    "Expected Delivery Date",
    "Status",
    "Weight",
    "Packages",
    "Product",
    "Payment Mode",
    "Comments",
];

const COUNTRIES: &[&str] = &["Jordan", "Iraq", "Saudi Arabia", "Egypt", "United Arab Emirates", "Kuwait"];
const PAYMENT_MODES: &[&str] = &["Cash on delivery", "كاش", "Card payment", "Visa", "نقدا", ""];
const STATUSES: &[&str] = &["Delivered", "In Transit", "On Hold", ""];
const PRODUCTS: &[&str] = &["Clothes", "Electronics, small", "Documents", "Spare parts"];

// 运单记录结构
#[derive(Clone)]
struct ShipmentRecord {
    shipment_id: String,
    shipment_title: String,
    shipper_name: String,
    shipper_phone: String,
    shipper_address: String,
    shipper_email: String,
    receiver_name: String,
    receiver_phone: String,
    receiver_address: String,
    receiver_email: String,
    origin: String,
    destination: String,
    pickup_date: String,
    expected_delivery_date: String,
    status: String,
    weight: String,
    packages: String,
    product: String,
    payment_mode: String,
    comments: String,
}

impl ShipmentRecord {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.shipment_id.clone(),
            self.shipment_title.clone(),
            self.shipper_name.clone(),
            self.shipper_phone.clone(),
            self.shipper_address.clone(),
            self.shipper_email.clone(),
            self.receiver_name.clone(),
            self.receiver_phone.clone(),
            self.receiver_address.clone(),
            self.receiver_email.clone(),
            self.origin.clone(),
            self.destination.clone(),
            self.pickup_date.clone(),
            self.expected_delivery_date.clone(),
            self.status.clone(),
            self.weight.clone(),
            self.packages.clone(),
            self.product.clone(),
            self.payment_mode.clone(),
            self.comments.clone(),
        ]
    }
}

// 生成正常运单记录
fn generate_normal_record(index: usize) -> ShipmentRecord {
    let today = Local::now().date_naive();
    let pickup = today - Duration::days((index % 60) as i64);
    let expected = pickup + Duration::days(3 + (index % 10) as i64);

    ShipmentRecord {
        shipment_id: format!("{}", index + 1),
        shipment_title: format!("SH-{:06}", index + 1),
        shipper_name: format!("Shipper {}", index + 1),
        shipper_phone: format!("0791{:06}", index),
        shipper_address: format!("Street {}, Amman", index % 40 + 1),
        shipper_email: if index % 3 == 0 {
            format!("shipper{}@example.com", index + 1)
        } else {
            String::new()
        },
        receiver_name: format!("Receiver {}", index + 1),
        receiver_phone: format!("0770{:06}", index),
        receiver_address: format!("Block {}, Baghdad", index % 25 + 1),
        receiver_email: String::new(),
        origin: COUNTRIES[index % COUNTRIES.len()].to_string(),
        destination: COUNTRIES[(index + 1) % COUNTRIES.len()].to_string(),
        pickup_date: pickup.format("%Y-%m-%d").to_string(),
        expected_delivery_date: expected.format("%Y-%m-%d").to_string(),
        status: STATUSES[index % STATUSES.len()].to_string(),
        weight: format!("{:.1}", 0.5 + (index % 40) as f64 * 0.5),
        packages: format!("{}", 1 + index % 5),
        product: PRODUCTS[index % PRODUCTS.len()].to_string(),
        payment_mode: PAYMENT_MODES[index % PAYMENT_MODES.len()].to_string(),
        comments: if index % 7 == 0 {
            "Handle with care".to_string()
        } else {
            String::new()
        },
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/datasets"));
    fs::create_dir_all(&out_dir)?;

    println!("开始生成测试数据集 → {}", out_dir.display());

    // 1. 正常数据 (100条)
    generate_normal_data(&out_dir)?;

    // 2. 大数据集 (1000条)
    generate_large_dataset(&out_dir)?;

    // 3. 文件内重复运单号
    generate_duplicate_within_file(&out_dir)?;

    // 4. 脏数据（数值/日期/付款方式）
    generate_messy_values(&out_dir)?;

    // 5. 缺失运单号
    generate_missing_numbers(&out_dir)?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn write_dataset(
    out_dir: &Path,
    file_name: &str,
    records: &[ShipmentRecord],
) -> Result<(), Box<dyn Error>> {
    let file = File::create(out_dir.join(file_name))?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 {} ({}条)", file_name, records.len());
    Ok(())
}

fn generate_normal_data(out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let records: Vec<_> = (0..100).map(generate_normal_record).collect();
    write_dataset(out_dir, "01_normal_data.csv", &records)
}

fn generate_large_dataset(out_dir: &Path) -> Result<(), Box<dyn Error>> {
    // 避免与其他数据集的运单号冲突
    let records: Vec<_> = (0..1000).map(|i| generate_normal_record(i + 10000)).collect();
    write_dataset(out_dir, "02_large_dataset.csv", &records)
}

fn generate_duplicate_within_file(out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut records: Vec<_> = (0..15).map(|i| generate_normal_record(i + 20000)).collect();

    // 追加5条重复运单号
    for i in [0, 3, 6, 9, 12] {
        records.push(generate_normal_record(i + 20000));
    }

    write_dataset(out_dir, "03_duplicate_within_file.csv", &records)
}

fn generate_messy_values(out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut records = Vec::new();

    // 重量非数字 / 小数逗号
    for (i, weight) in ["abc", "2,5", "-3", ""].iter().enumerate() {
        let mut record = generate_normal_record(i + 30000);
        record.weight = weight.to_string();
        records.push(record);
    }

    // 件数为空 / 非数字 / 0
    for (i, packages) in ["", "two", "0"].iter().enumerate() {
        let mut record = generate_normal_record(i + 30010);
        record.packages = packages.to_string();
        records.push(record);
    }

    // 日期无法解析 / 缺失 / 其他格式
    for (i, (pickup, expected)) in [
        ("next tuesday", ""),
        ("", ""),
        ("03/15/2024", "March 20, 2024"),
        ("2024-3-7 10:00", "2024-13-45"),
    ]
    .iter()
    .enumerate()
    {
        let mut record = generate_normal_record(i + 30020);
        record.pickup_date = pickup.to_string();
        record.expected_delivery_date = expected.to_string();
        records.push(record);
    }

    // 起运地/目的地缺失
    let mut record = generate_normal_record(30030);
    record.origin = String::new();
    records.push(record);

    write_dataset(out_dir, "04_messy_values.csv", &records)
}

fn generate_missing_numbers(out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let records: Vec<_> = (0..5)
        .map(|i| {
            let mut record = generate_normal_record(i + 40000);
            record.shipment_id = String::new();
            record.shipment_title = String::new();
            record
        })
        .collect();

    write_dataset(out_dir, "05_missing_numbers.csv", &records)
}
