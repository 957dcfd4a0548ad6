// ==========================================
// 快递运费计算系统 - 列识别与字段映射
// ==========================================
// 职责: 表头 → 逻辑列（运单号/目的地/重量）+ 类型转换
// 识别顺序: 别名精确匹配 → 关键字包含匹配
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

const WAYBILL_ALIASES: &[&str] = &[
    "运单号", "快递单号", "物流单号", "单号", "订单号", "waybill", "waybill_id", "waybillid",
    "waybill_no", "tracking_no", "tracking_number",
];
const WAYBILL_KEYWORDS: &[&str] = &["运单", "单号", "waybill", "tracking"];

const DESTINATION_ALIASES: &[&str] = &[
    "目的地", "省份", "收件省份", "目的省份", "目的地省份", "地区", "区域", "destination",
    "province", "region", "dest",
];
const DESTINATION_KEYWORDS: &[&str] = &["目的", "省", "地区", "区域", "destination", "province", "region", "地址", "address"];

const WEIGHT_ALIASES: &[&str] = &[
    "重量", "重量(kg)", "重量（kg）", "计费重量", "实际重量", "weight", "weight_kg", "weight(kg)",
];
const WEIGHT_KEYWORDS: &[&str] = &["重量", "weight", "kg", "公斤"];

/// 重量单位后缀（均视为 kg）
const WEIGHT_UNIT_SUFFIXES: &[&str] = &["kg", "公斤", "千克"];

/// 识别出的列映射（值为原始表头）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub waybill: Option<String>,
    pub destination: String,
    pub weight: String,
}

/// 映射后的行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedRow {
    pub waybill_id: Option<String>,
    pub destination: String,
    pub weight: Decimal,
}

fn normalize_header(h: &str) -> String {
    h.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

pub struct FieldMapper;

impl FieldMapper {
    /// 根据表头识别列
    ///
    /// # 返回
    /// - Err(MissingColumn): 未识别到目的地列或重量列
    pub fn infer_columns(&self, headers: &[String]) -> ImportResult<ColumnMapping> {
        let mut used: Vec<usize> = Vec::new();

        // 重量、目的地优先，避免 "单号" 等宽泛关键字抢占
        let weight = Self::find_column(headers, WEIGHT_ALIASES, WEIGHT_KEYWORDS, &used)
            .ok_or_else(|| missing_column("重量", headers))?;
        used.push(weight);

        let destination =
            Self::find_column(headers, DESTINATION_ALIASES, DESTINATION_KEYWORDS, &used)
                .ok_or_else(|| missing_column("目的地", headers))?;
        used.push(destination);

        let waybill = Self::find_column(headers, WAYBILL_ALIASES, WAYBILL_KEYWORDS, &used);

        Ok(ColumnMapping {
            waybill: waybill.map(|i| headers[i].clone()),
            destination: headers[destination].clone(),
            weight: headers[weight].clone(),
        })
    }

    fn find_column(
        headers: &[String],
        aliases: &[&str],
        keywords: &[&str],
        used: &[usize],
    ) -> Option<usize> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let free = |i: &usize| !used.contains(i) && !normalized[*i].is_empty();

        // 别名按列表顺序优先
        for alias in aliases {
            let alias = normalize_header(alias);
            if let Some(i) = (0..headers.len()).filter(free).find(|i| normalized[*i] == alias) {
                return Some(i);
            }
        }

        for keyword in keywords {
            if let Some(i) = (0..headers.len())
                .filter(free)
                .find(|i| normalized[*i].contains(keyword))
            {
                return Some(i);
            }
        }
        None
    }

    /// 映射单行
    ///
    /// # 返回
    /// - Ok(MappedRow)
    /// - Err(message): 行级问题描述（该行跳过）
    pub fn map_row(
        &self,
        mapping: &ColumnMapping,
        row: &HashMap<String, String>,
    ) -> Result<MappedRow, String> {
        let get = |key: &str| {
            row.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let destination = get(&mapping.destination).ok_or_else(|| "目的地为空".to_string())?;
        let raw_weight = get(&mapping.weight).ok_or_else(|| "重量为空".to_string())?;
        let weight = parse_weight(&raw_weight)
            .ok_or_else(|| format!("无法解析重量: {}", raw_weight))?;
        if weight <= Decimal::ZERO {
            return Err(format!("重量必须大于 0: {}", raw_weight));
        }

        Ok(MappedRow {
            waybill_id: mapping.waybill.as_deref().and_then(get),
            destination,
            weight,
        })
    }
}

fn missing_column(field: &str, headers: &[String]) -> ImportError {
    ImportError::MissingColumn {
        field: field.to_string(),
        headers: headers.join(", "),
    }
}

/// 解析重量文本，允许 kg/公斤/千克 后缀与千分位逗号
pub fn parse_weight(text: &str) -> Option<Decimal> {
    let lowered = text.trim().to_lowercase();
    let mut value = lowered.as_str();
    for suffix in WEIGHT_UNIT_SUFFIXES {
        if let Some(stripped) = value.strip_suffix(suffix) {
            value = stripped;
            break;
        }
    }
    let value = value.trim().replace(',', "");

    Decimal::from_str(&value)
        .or_else(|_| Decimal::from_scientific(&value))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(hs: &[&str]) -> Vec<String> {
        hs.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_infer_exact_aliases() {
        let mapping = FieldMapper
            .infer_columns(&headers(&["运单号", "目的地", "重量"]))
            .unwrap();
        assert_eq!(mapping.waybill.as_deref(), Some("运单号"));
        assert_eq!(mapping.destination, "目的地");
        assert_eq!(mapping.weight, "重量");
    }

    #[test]
    fn test_infer_english_case_insensitive() {
        let mapping = FieldMapper
            .infer_columns(&headers(&["Waybill", "Province", "Weight (kg)"]))
            .unwrap();
        assert_eq!(mapping.waybill.as_deref(), Some("Waybill"));
        assert_eq!(mapping.destination, "Province");
        assert_eq!(mapping.weight, "Weight (kg)");
    }

    #[test]
    fn test_infer_by_keyword() {
        let mapping = FieldMapper
            .infer_columns(&headers(&["序号", "快递运单编号", "收件人地址", "包裹重量"]))
            .unwrap();
        assert_eq!(mapping.waybill.as_deref(), Some("快递运单编号"));
        assert_eq!(mapping.destination, "收件人地址");
        assert_eq!(mapping.weight, "包裹重量");
    }

    #[test]
    fn test_waybill_column_optional() {
        let mapping = FieldMapper
            .infer_columns(&headers(&["省份", "重量"]))
            .unwrap();
        assert!(mapping.waybill.is_none());
    }

    #[test]
    fn test_missing_weight_column() {
        let err = FieldMapper
            .infer_columns(&headers(&["运单号", "目的地"]))
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn { ref field, .. } if field == "重量"));
    }

    #[test]
    fn test_parse_weight_variants() {
        assert_eq!(parse_weight("2.5"), Some(Decimal::new(25, 1)));
        assert_eq!(parse_weight("2.5kg"), Some(Decimal::new(25, 1)));
        assert_eq!(parse_weight(" 3 KG "), Some(Decimal::new(3, 0)));
        assert_eq!(parse_weight("1公斤"), Some(Decimal::new(1, 0)));
        assert_eq!(parse_weight("1,200"), Some(Decimal::new(1200, 0)));
        assert_eq!(parse_weight("abc"), None);
    }

    #[test]
    fn test_map_row_rejects_non_positive_weight() {
        let mapping = ColumnMapping {
            waybill: None,
            destination: "目的地".to_string(),
            weight: "重量".to_string(),
        };
        let mut row = HashMap::new();
        row.insert("目的地".to_string(), "北京".to_string());
        row.insert("重量".to_string(), "0".to_string());

        assert!(FieldMapper.map_row(&mapping, &row).is_err());
    }
}
