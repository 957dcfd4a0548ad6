// ==========================================
// 快递运费计算系统 - 目的地区域归一化
// ==========================================
// 输入: 表格中的目的地文本（代码/全称/简称/拼音/地址）
// 输出: Region；无法识别返回 None，由上层透传给引擎报错
// ==========================================

use crate::domain::types::Region;

/// 拼音之外的常见英文写法
const ENGLISH_ALIASES: &[(&str, Region)] = &[
    ("innermongolia", Region::InnerMongolia),
    ("neimongol", Region::InnerMongolia),
    ("tibet", Region::Tibet),
    ("peking", Region::Beijing),
];

pub struct RegionNormalizer;

impl RegionNormalizer {
    /// 识别目的地文本
    pub fn normalize(&self, text: &str) -> Option<Region> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        // 1. 区域代码
        if let Some(region) = Region::from_code(text) {
            return Some(region);
        }

        // 2. 中文全称 / 简称
        if let Some(region) = Region::ALL
            .iter()
            .copied()
            .find(|r| r.full_name() == text || r.short_name() == text)
        {
            return Some(region);
        }

        // 3. 拼音 / 英文
        let latin = latin_key(text);
        if !latin.is_empty() {
            if let Some(region) = Self::match_latin(&latin) {
                return Some(region);
            }
        }

        // 4. 地址前缀（取最长匹配，如 "广东省深圳市…"）
        Region::ALL
            .iter()
            .copied()
            .filter_map(|r| {
                if text.starts_with(r.full_name()) {
                    Some((r, r.full_name().chars().count()))
                } else if text.starts_with(r.short_name()) {
                    Some((r, r.short_name().chars().count()))
                } else {
                    None
                }
            })
            .max_by_key(|(_, len)| *len)
            .map(|(r, _)| r)
    }

    fn match_latin(key: &str) -> Option<Region> {
        let stripped = key
            .strip_suffix("province")
            .or_else(|| key.strip_suffix("sheng"))
            .or_else(|| key.strip_suffix("city"))
            .or_else(|| key.strip_suffix("shi"))
            .unwrap_or(key);

        Region::ALL
            .iter()
            .copied()
            .find(|r| r.pinyin() == key || r.pinyin() == stripped)
            .or_else(|| {
                ENGLISH_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == key || *alias == stripped)
                    .map(|(_, r)| *r)
            })
    }
}

/// 仅保留 ASCII 字母并转小写；含非 ASCII 字母时返回空串
fn latin_key(text: &str) -> String {
    if text.chars().any(|c| !c.is_ascii()) {
        return String::new();
    }
    text.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_names() {
        let n = RegionNormalizer;
        assert_eq!(n.normalize("bj"), Some(Region::Beijing));
        assert_eq!(n.normalize("北京市"), Some(Region::Beijing));
        assert_eq!(n.normalize("北京"), Some(Region::Beijing));
        assert_eq!(n.normalize("广西壮族自治区"), Some(Region::Guangxi));
        assert_eq!(n.normalize("  新疆 "), Some(Region::Xinjiang));
    }

    #[test]
    fn test_pinyin_and_english() {
        let n = RegionNormalizer;
        assert_eq!(n.normalize("Guangdong"), Some(Region::Guangdong));
        assert_eq!(n.normalize("guangdong sheng"), Some(Region::Guangdong));
        assert_eq!(n.normalize("Shanghai City"), Some(Region::Shanghai));
        assert_eq!(n.normalize("Shaanxi"), Some(Region::Shaanxi));
        assert_eq!(n.normalize("Shanxi"), Some(Region::Shanxi));
        assert_eq!(n.normalize("Inner Mongolia"), Some(Region::InnerMongolia));
        assert_eq!(n.normalize("Tibet"), Some(Region::Tibet));
    }

    #[test]
    fn test_address_prefix() {
        let n = RegionNormalizer;
        assert_eq!(n.normalize("广东省深圳市南山区科技园"), Some(Region::Guangdong));
        assert_eq!(n.normalize("黑龙江哈尔滨市"), Some(Region::Heilongjiang));
        assert_eq!(n.normalize("内蒙古呼和浩特"), Some(Region::InnerMongolia));
    }

    #[test]
    fn test_unknown_text() {
        let n = RegionNormalizer;
        assert_eq!(n.normalize(""), None);
        assert_eq!(n.normalize("台湾"), None);
        assert_eq!(n.normalize("Atlantis"), None);
    }
}
