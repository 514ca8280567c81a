//! 节点属性文件解析
//!
//! 节点配置文件采用 `[section]` + `key = value` 的文本格式。解析结果保留原始
//! 字符串，类型转换由调用方按需完成：
//!
//! ```text
//! [chain]
//! maxDifficultyBlocks = 60
//! defaultDynamicFeeMultiplier = 10'000
//!
//! [plugin:catapult.plugins.namespace]
//! rootNamespaceRentalFeePerBlock = 1'000
//! ```

use std::collections::BTreeMap;

use chainrest_core::{NetworkError, NetworkResult};
use ini::{Ini, ParseOption};

/// 单个配置段: key -> value
pub type PropertySection = BTreeMap<String, String>;

/// 解析后的属性文件: 配置段名 -> 配置段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyDocument {
    sections: BTreeMap<String, PropertySection>,
}

impl PropertyDocument {
    /// 解析属性文件文本
    ///
    /// 以 `#` 或 `;` 开头的行以及值后面以空白加 `#`/`;` 开始的内容为注释。
    /// 出现在任何配置段之前的键归入名称为空的根配置段。重复出现的配置段会被合并，
    /// 重复的键以最后一次出现为准。反斜杠按原样保留。
    pub fn parse(text: &str) -> NetworkResult<Self> {
        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options).map_err(|e| {
            NetworkError::MalformedProperties {
                line: e.line,
                message: e.msg.into_owned(),
            }
        })?;

        let mut sections: BTreeMap<String, PropertySection> = BTreeMap::new();
        for (name, properties) in &ini {
            // 根配置段总是存在，没有键时不保留
            if name.is_none() && properties.is_empty() {
                continue;
            }
            let section = sections.entry(name.unwrap_or_default().to_string()).or_default();
            for (key, value) in properties.iter() {
                section.insert(key.to_string(), value.to_string());
            }
        }

        Ok(Self { sections })
    }

    pub fn section(&self, name: &str) -> Option<&PropertySection> {
        self.sections.get(name)
    }

    pub fn require_section(&self, name: &str) -> NetworkResult<&PropertySection> {
        self.section(name)
            .ok_or_else(|| NetworkError::missing_section(name))
    }

    /// 读取必需的配置项
    pub fn value(&self, section: &str, key: &str) -> NetworkResult<&str> {
        self.require_section(section)?
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| NetworkError::missing_property(section, key))
    }

    /// 遍历名称以 `prefix` 开头的配置段，返回去掉前缀后的名称
    pub fn sections_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a PropertySection)> + 'a {
        self.sections
            .iter()
            .filter_map(move |(name, section)| {
                name.strip_prefix(prefix).map(|rest| (rest, section))
            })
    }

}

/// 去掉所有非数字字符 (千位分隔符 `'`、类型后缀等)
pub fn strip_non_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// 清理后按 u64 解析; 清理结果为空同样视为无效数值
pub fn parse_sanitized_u64(value: &str) -> NetworkResult<u64> {
    let digits = strip_non_digits(value);
    digits
        .parse::<u64>()
        .map_err(|e| NetworkError::invalid_number(value, e))
}

pub fn parse_sanitized_u32(value: &str) -> NetworkResult<u32> {
    let digits = strip_non_digits(value);
    digits
        .parse::<u32>()
        .map_err(|e| NetworkError::invalid_number(value, e))
}
