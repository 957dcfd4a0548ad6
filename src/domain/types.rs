// ==========================================
// 快递运费计算系统 - 领域类型定义
// ==========================================
// 区域: 固定枚举（31 个省级行政区），仅作价格表查找键
// 规则模式: 首重续重阶梯 / 固定费用+单价
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 区域 (Region)
// ==========================================
// 序列化格式: 两位大写代码 (与规则存储一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "BJ")]
    Beijing,
    #[serde(rename = "TJ")]
    Tianjin,
    #[serde(rename = "HE")]
    Hebei,
    #[serde(rename = "SX")]
    Shanxi,
    #[serde(rename = "NM")]
    InnerMongolia,
    #[serde(rename = "LN")]
    Liaoning,
    #[serde(rename = "JL")]
    Jilin,
    #[serde(rename = "HL")]
    Heilongjiang,
    #[serde(rename = "SH")]
    Shanghai,
    #[serde(rename = "JS")]
    Jiangsu,
    #[serde(rename = "ZJ")]
    Zhejiang,
    #[serde(rename = "AH")]
    Anhui,
    #[serde(rename = "FJ")]
    Fujian,
    #[serde(rename = "JX")]
    Jiangxi,
    #[serde(rename = "SD")]
    Shandong,
    #[serde(rename = "HA")]
    Henan,
    #[serde(rename = "HB")]
    Hubei,
    #[serde(rename = "HN")]
    Hunan,
    #[serde(rename = "GD")]
    Guangdong,
    #[serde(rename = "GX")]
    Guangxi,
    #[serde(rename = "HI")]
    Hainan,
    #[serde(rename = "CQ")]
    Chongqing,
    #[serde(rename = "SC")]
    Sichuan,
    #[serde(rename = "GZ")]
    Guizhou,
    #[serde(rename = "YN")]
    Yunnan,
    #[serde(rename = "XZ")]
    Tibet,
    #[serde(rename = "SN")]
    Shaanxi,
    #[serde(rename = "GS")]
    Gansu,
    #[serde(rename = "QH")]
    Qinghai,
    #[serde(rename = "NX")]
    Ningxia,
    #[serde(rename = "XJ")]
    Xinjiang,
}

impl Region {
    /// 全部区域（按行政区划顺序）
    pub const ALL: [Region; 31] = [
        Region::Beijing,
        Region::Tianjin,
        Region::Hebei,
        Region::Shanxi,
        Region::InnerMongolia,
        Region::Liaoning,
        Region::Jilin,
        Region::Heilongjiang,
        Region::Shanghai,
        Region::Jiangsu,
        Region::Zhejiang,
        Region::Anhui,
        Region::Fujian,
        Region::Jiangxi,
        Region::Shandong,
        Region::Henan,
        Region::Hubei,
        Region::Hunan,
        Region::Guangdong,
        Region::Guangxi,
        Region::Hainan,
        Region::Chongqing,
        Region::Sichuan,
        Region::Guizhou,
        Region::Yunnan,
        Region::Tibet,
        Region::Shaanxi,
        Region::Gansu,
        Region::Qinghai,
        Region::Ningxia,
        Region::Xinjiang,
    ];

    /// (代码, 全称, 简称, 拼音)
    fn info(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            Region::Beijing => ("BJ", "北京市", "北京", "beijing"),
            Region::Tianjin => ("TJ", "天津市", "天津", "tianjin"),
            Region::Hebei => ("HE", "河北省", "河北", "hebei"),
            Region::Shanxi => ("SX", "山西省", "山西", "shanxi"),
            Region::InnerMongolia => ("NM", "内蒙古自治区", "内蒙古", "neimenggu"),
            Region::Liaoning => ("LN", "辽宁省", "辽宁", "liaoning"),
            Region::Jilin => ("JL", "吉林省", "吉林", "jilin"),
            Region::Heilongjiang => ("HL", "黑龙江省", "黑龙江", "heilongjiang"),
            Region::Shanghai => ("SH", "上海市", "上海", "shanghai"),
            Region::Jiangsu => ("JS", "江苏省", "江苏", "jiangsu"),
            Region::Zhejiang => ("ZJ", "浙江省", "浙江", "zhejiang"),
            Region::Anhui => ("AH", "安徽省", "安徽", "anhui"),
            Region::Fujian => ("FJ", "福建省", "福建", "fujian"),
            Region::Jiangxi => ("JX", "江西省", "江西", "jiangxi"),
            Region::Shandong => ("SD", "山东省", "山东", "shandong"),
            Region::Henan => ("HA", "河南省", "河南", "henan"),
            Region::Hubei => ("HB", "湖北省", "湖北", "hubei"),
            Region::Hunan => ("HN", "湖南省", "湖南", "hunan"),
            Region::Guangdong => ("GD", "广东省", "广东", "guangdong"),
            Region::Guangxi => ("GX", "广西壮族自治区", "广西", "guangxi"),
            Region::Hainan => ("HI", "海南省", "海南", "hainan"),
            Region::Chongqing => ("CQ", "重庆市", "重庆", "chongqing"),
            Region::Sichuan => ("SC", "四川省", "四川", "sichuan"),
            Region::Guizhou => ("GZ", "贵州省", "贵州", "guizhou"),
            Region::Yunnan => ("YN", "云南省", "云南", "yunnan"),
            Region::Tibet => ("XZ", "西藏自治区", "西藏", "xizang"),
            Region::Shaanxi => ("SN", "陕西省", "陕西", "shaanxi"),
            Region::Gansu => ("GS", "甘肃省", "甘肃", "gansu"),
            Region::Qinghai => ("QH", "青海省", "青海", "qinghai"),
            Region::Ningxia => ("NX", "宁夏回族自治区", "宁夏", "ningxia"),
            Region::Xinjiang => ("XJ", "新疆维吾尔自治区", "新疆", "xinjiang"),
        }
    }

    /// 两位区域代码，如 "BJ"
    pub fn code(self) -> &'static str {
        self.info().0
    }

    /// 行政区全称，如 "北京市"
    pub fn full_name(self) -> &'static str {
        self.info().1
    }

    /// 行政区简称，如 "北京"
    pub fn short_name(self) -> &'static str {
        self.info().2
    }

    /// 小写拼音，如 "beijing"
    pub fn pinyin(self) -> &'static str {
        self.info().3
    }

    /// 按代码查找（忽略大小写与首尾空白）
    pub fn from_code(code: &str) -> Option<Region> {
        let code = code.trim();
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::from_code(s).ok_or_else(|| format!("未知区域代码: {}", s))
    }
}

// ==========================================
// 计费模式 (Rule Mode)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleMode {
    ThresholdTiered, // 首重阈值 + 续重（首重可阶梯）
    FlatPlusRate,    // 固定费用 + 每公斤单价
}

impl RuleMode {
    pub fn to_db_str(self) -> &'static str {
        match self {
            RuleMode::ThresholdTiered => "THRESHOLD_TIERED",
            RuleMode::FlatPlusRate => "FLAT_PLUS_RATE",
        }
    }
}

impl fmt::Display for RuleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_enumeration_is_closed_and_unique() {
        let mut codes: Vec<&str> = Region::ALL.iter().map(|r| r.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 31);
    }

    #[test]
    fn test_region_from_code_ignores_case() {
        assert_eq!(Region::from_code("bj"), Some(Region::Beijing));
        assert_eq!(Region::from_code(" GD "), Some(Region::Guangdong));
        assert_eq!(Region::from_code("TW"), None);
        assert!("XX".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_serializes_as_code() {
        let json = serde_json::to_string(&Region::Shanghai).unwrap();
        assert_eq!(json, "\"SH\"");
        let back: Region = serde_json::from_str("\"XJ\"").unwrap();
        assert_eq!(back, Region::Xinjiang);
    }
}
